// Tests for the WAV file capture source: frame geometry, ordering, and the
// AudioSource lifecycle against a generated fixture.

use anyhow::Result;
use escucha::{AudioSource, FrameQueue, SourceConfig, WavSource};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, samples: &[i16]) -> Result<std::path::PathBuf> {
    let path = dir.path().join("fixture.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(path)
}

#[test]
fn test_wav_source_delivers_fixed_duration_frames() -> Result<()> {
    let dir = TempDir::new()?;
    // 300ms of audio at 16kHz
    let samples: Vec<i16> = (0..4800).map(|i| (i % 100) as i16).collect();
    let path = write_fixture(&dir, &samples)?;

    let config = SourceConfig::default(); // 100ms frames -> 1600 samples each
    let queue = Arc::new(FrameQueue::new(64));

    let mut source = WavSource::new(&path, &config).without_pacing();
    source.start(Arc::clone(&queue))?;
    source.stop()?;

    let mut delivered = Vec::new();
    while let Some(frame) = queue.pop(Duration::from_millis(10)) {
        delivered.push(frame);
    }

    assert_eq!(delivered.len(), 3);
    for (i, frame) in delivered.iter().enumerate() {
        assert_eq!(frame.samples.len(), 1600);
        assert_eq!(frame.sample_rate, 16000);
        assert_eq!(frame.channels, 1);
        assert_eq!(frame.timestamp_ms, i as u64 * 100);
    }

    // Samples survive the trip intact and in order.
    let replayed: Vec<i16> = delivered.into_iter().flat_map(|f| f.samples).collect();
    assert_eq!(replayed, samples);

    Ok(())
}

#[test]
fn test_wav_source_emits_trailing_partial_frame() -> Result<()> {
    let dir = TempDir::new()?;
    // 150ms: one full 100ms frame plus a 50ms remainder
    let samples = vec![0i16; 2400];
    let path = write_fixture(&dir, &samples)?;

    let queue = Arc::new(FrameQueue::new(64));
    let mut source = WavSource::new(&path, &SourceConfig::default()).without_pacing();
    source.start(Arc::clone(&queue))?;
    source.stop()?;

    let first = queue.pop(Duration::from_millis(10)).expect("full frame");
    let second = queue.pop(Duration::from_millis(10)).expect("partial frame");

    assert_eq!(first.samples.len(), 1600);
    assert_eq!(second.samples.len(), 800);
    assert!(queue.pop(Duration::from_millis(10)).is_none());

    Ok(())
}

#[test]
fn test_wav_source_missing_file_is_a_device_error() {
    let queue = Arc::new(FrameQueue::new(4));
    let mut source = WavSource::new("does/not/exist.wav", &SourceConfig::default());

    let err = source.start(queue).expect_err("missing file must fail");
    assert!(err.to_string().contains("exist.wav"), "unhelpful error: {err}");
}

#[test]
fn test_wav_source_stop_is_idempotent() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_fixture(&dir, &vec![0i16; 1600])?;

    let queue = Arc::new(FrameQueue::new(4));
    let mut source = WavSource::new(&path, &SourceConfig::default()).without_pacing();
    source.start(queue)?;

    source.stop()?;
    source.stop()?;

    Ok(())
}
