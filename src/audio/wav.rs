use super::queue::FrameQueue;
use super::source::{AudioFrame, AudioSource, SourceConfig};
use crate::error::DeviceError;
use anyhow::{Context, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::info;

/// WAV file capture source
///
/// Streams a recorded file through the same `AudioSource` seam the
/// microphone uses, so sessions can run against canned audio in tests or
/// batch processing. With `realtime` pacing enabled, frames are delivered at
/// the cadence a live device would produce them; without it the whole file
/// is pushed as fast as the queue accepts it.
pub struct WavSource {
    path: PathBuf,
    frame_duration_ms: u64,
    realtime: bool,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl WavSource {
    pub fn new(path: impl AsRef<Path>, config: &SourceConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frame_duration_ms: config.frame_duration_ms,
            realtime: true,
            shutdown: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Disable real-time pacing (deliver frames back to back).
    pub fn without_pacing(mut self) -> Self {
        self.realtime = false;
        self
    }

    fn read_frames(path: &Path, frame_duration_ms: u64) -> Result<Vec<AudioFrame>> {
        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);
        info!(
            "WAV file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        let samples_per_frame =
            (spec.sample_rate as u64 * frame_duration_ms / 1000) as usize * spec.channels as usize;

        let frames = samples
            .chunks(samples_per_frame.max(1))
            .enumerate()
            .map(|(i, chunk)| AudioFrame {
                samples: chunk.to_vec(),
                sample_rate: spec.sample_rate,
                channels: spec.channels,
                timestamp_ms: i as u64 * frame_duration_ms,
            })
            .collect();

        Ok(frames)
    }
}

impl AudioSource for WavSource {
    fn start(&mut self, queue: Arc<FrameQueue>) -> Result<(), DeviceError> {
        let frames = Self::read_frames(&self.path, self.frame_duration_ms)
            .map_err(|e| DeviceError::Backend(e.to_string()))?;

        let shutdown = Arc::clone(&self.shutdown);
        let realtime = self.realtime;
        let pace = Duration::from_millis(self.frame_duration_ms);

        let worker = std::thread::Builder::new()
            .name("wav-capture".to_string())
            .spawn(move || {
                for frame in frames {
                    if shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    queue.push(frame);
                    if realtime {
                        std::thread::sleep(pace);
                    }
                }
            })
            .map_err(|e| DeviceError::Backend(e.to_string()))?;

        self.worker = Some(worker);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        if let Some(worker) = self.worker.take() {
            self.shutdown.store(true, Ordering::SeqCst);
            if worker.join().is_err() {
                return Err(DeviceError::Backend("wav capture thread panicked".to_string()));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "wav-file"
    }
}
