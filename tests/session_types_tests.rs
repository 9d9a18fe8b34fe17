// Unit tests for the session's value types: silence tracking, transcript
// accumulation, and configuration defaults.

use escucha::{AudioFrame, SessionConfig, SilenceTracker, SourceConfig, Transcript};
use std::time::{Duration, Instant};

#[test]
fn test_silence_tracker_counts_from_session_start() {
    let start = Instant::now();
    let tracker = SilenceTracker::new(start);

    let later = start + Duration::from_secs(8);
    assert_eq!(tracker.since_activity(later), Duration::from_secs(8));
    assert!(tracker.timed_out(later, Duration::from_secs(7)));
}

#[test]
fn test_silence_tracker_resets_on_activity() {
    let start = Instant::now();
    let mut tracker = SilenceTracker::new(start);

    tracker.mark_activity(start + Duration::from_secs(5));

    let now = start + Duration::from_secs(10);
    assert_eq!(tracker.since_activity(now), Duration::from_secs(5));
    assert!(!tracker.timed_out(now, Duration::from_secs(7)));
    assert!(tracker.timed_out(start + Duration::from_secs(12), Duration::from_secs(7)));
}

#[test]
fn test_silence_timeout_boundary_is_inclusive() {
    let start = Instant::now();
    let tracker = SilenceTracker::new(start);

    // Exactly at the boundary counts as timed out.
    assert!(tracker.timed_out(start + Duration::from_secs(7), Duration::from_secs(7)));
    assert!(!tracker.timed_out(start + Duration::from_millis(6999), Duration::from_secs(7)));
}

#[test]
fn test_transcript_joins_fragments_with_single_spaces() {
    let mut transcript = Transcript::new();
    transcript.push("abre la ventana");
    transcript.push("y apaga la luz");

    assert_eq!(transcript.finish(), "abre la ventana y apaga la luz");
    assert_eq!(transcript.len(), 2);
}

#[test]
fn test_transcript_ignores_whitespace_fragments() {
    let mut transcript = Transcript::new();
    transcript.push("  hola  ");
    transcript.push("");
    transcript.push("   ");

    assert_eq!(transcript.finish(), "hola");
    assert_eq!(transcript.len(), 1);
}

#[test]
fn test_empty_transcript_finishes_empty() {
    let transcript = Transcript::new();
    assert!(transcript.is_empty());
    assert_eq!(transcript.finish(), "");
}

#[test]
fn test_session_config_defaults() {
    let config = SessionConfig::default();

    assert_eq!(config.sample_rate, 16000, "recognizers expect 16kHz");
    assert_eq!(config.channels, 1, "default should be mono");
    assert_eq!(config.silence_timeout, Duration::from_secs(7));
    assert_eq!(config.queue_capacity, 50);
    assert!(config.device.is_none());
    assert!(
        config.poll_interval < config.silence_timeout,
        "poll bound must not starve the timeout check"
    );
}

#[test]
fn test_source_config_samples_per_frame() {
    let config = SourceConfig {
        sample_rate: 16000,
        channels: 1,
        frame_duration_ms: 100,
        device: None,
    };
    assert_eq!(config.samples_per_frame(), 1600);

    let stereo = SourceConfig {
        channels: 2,
        ..config
    };
    assert_eq!(stereo.samples_per_frame(), 3200);
}

#[test]
fn test_audio_frame_duration() {
    let frame = AudioFrame {
        samples: vec![0i16; 1600],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: 0,
    };
    assert_eq!(frame.duration_ms(), 100);

    let stereo = AudioFrame {
        samples: vec![0i16; 3200],
        sample_rate: 16000,
        channels: 2,
        timestamp_ms: 0,
    };
    assert_eq!(stereo.duration_ms(), 100);
}
