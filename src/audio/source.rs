use crate::audio::FrameQueue;
use crate::error::DeviceError;
use std::sync::Arc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

impl AudioFrame {
    /// Frame length in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        let frames = self.samples.len() as u64 / self.channels as u64;
        frames * 1000 / self.sample_rate as u64
    }
}

/// Configuration for a capture source
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Capture sample rate in Hz
    pub sample_rate: u32,
    /// Channel count (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Duration of each delivered frame in milliseconds (affects latency)
    pub frame_duration_ms: u64,
    /// Input device name; `None` selects the system default
    pub device: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // 16kHz, what streaming recognizers expect
            channels: 1,        // Mono
            frame_duration_ms: 100,
            device: None,
        }
    }
}

impl SourceConfig {
    /// Samples per delivered frame (all channels interleaved).
    pub fn samples_per_frame(&self) -> usize {
        (self.sample_rate as u64 * self.frame_duration_ms / 1000) as usize
            * self.channels as usize
    }
}

/// Audio capture source trait
///
/// Implementations:
/// - `MicSource`: cpal microphone input (all platforms)
/// - `WavSource`: read from a WAV file (for testing/offline processing)
///
/// A source delivers frames into the supplied queue from its own producer
/// context (driver callback thread or worker thread). `stop()` is idempotent
/// and must not return until frame delivery has quiesced: no `push` happens
/// after `stop()` returns.
pub trait AudioSource: Send {
    /// Open the device and begin delivering frames into `queue`
    fn start(&mut self, queue: Arc<FrameQueue>) -> Result<(), DeviceError>;

    /// Stop capturing; safe to call more than once
    fn stop(&mut self) -> Result<(), DeviceError>;

    /// Source name for logging
    fn name(&self) -> &str;
}
