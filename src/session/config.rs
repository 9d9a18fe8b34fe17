use crate::audio::SourceConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a streaming capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "capture-2026-08-30-kitchen")
    pub session_id: String,

    /// Capture sample rate in Hz (streaming recognizers expect 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Duration of each captured frame in milliseconds
    pub frame_duration_ms: u64,

    /// How long to keep listening after the last committed utterance
    /// Default: 7 seconds
    pub silence_timeout: Duration,

    /// Upper bound on each queue wait in the consumer loop.
    /// Must stay below `silence_timeout` so the timeout check is never
    /// starved by an idle queue.
    pub poll_interval: Duration,

    /// Maximum buffered frames before the oldest is dropped
    pub queue_capacity: usize,

    /// Input device name; `None` selects the system default
    pub device: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("capture-{}", uuid::Uuid::new_v4()),
            sample_rate: 16000,
            channels: 1,
            frame_duration_ms: 100,
            silence_timeout: Duration::from_secs(7),
            poll_interval: Duration::from_secs(1),
            queue_capacity: 50,
            device: None,
        }
    }
}

impl SessionConfig {
    /// Capture-source view of this configuration.
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
            frame_duration_ms: self.frame_duration_ms,
            device: self.device.clone(),
        }
    }
}
