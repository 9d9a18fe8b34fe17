// Test doubles for driving sessions without real audio hardware or a real
// recognizer engine.

#![allow(dead_code)]

use escucha::{
    AudioFrame, AudioSource, DeviceError, FrameQueue, RecognitionResult, RecognizerError,
    RecognizerPort,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// A mono 16kHz frame of silence with the given sample count.
pub fn frame(samples: usize, timestamp_ms: u64) -> AudioFrame {
    AudioFrame {
        samples: vec![0i16; samples],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms,
    }
}

/// Synthetic audio source: delivers a fixed list of frames from a worker
/// thread at a fixed interval, then goes quiet.
pub struct ScriptedSource {
    frames: Vec<AudioFrame>,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<AudioFrame>, interval: Duration) -> Self {
        Self {
            frames,
            interval,
            shutdown: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// A source that never delivers a frame.
    pub fn silent() -> Self {
        Self::new(Vec::new(), Duration::from_millis(10))
    }
}

impl AudioSource for ScriptedSource {
    fn start(&mut self, queue: Arc<FrameQueue>) -> Result<(), DeviceError> {
        let frames = std::mem::take(&mut self.frames);
        let interval = self.interval;
        let shutdown = Arc::clone(&self.shutdown);

        self.worker = Some(std::thread::spawn(move || {
            for frame in frames {
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
                queue.push(frame);
                std::thread::sleep(interval);
            }
        }));

        Ok(())
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A source whose device cannot be opened.
pub struct BrokenSource;

impl AudioSource for BrokenSource {
    fn start(&mut self, _queue: Arc<FrameQueue>) -> Result<(), DeviceError> {
        Err(DeviceError::NotFound("usb-mic".to_string()))
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Synthetic recognizer: plays back a per-frame script of results, then
/// returns `None` for any further frames. `finalize()` yields a fixed
/// closing fragment.
pub struct ScriptedRecognizer {
    script: VecDeque<Option<RecognitionResult>>,
    final_text: String,
    expected_samples: Option<usize>,
}

impl ScriptedRecognizer {
    pub fn new(
        script: Vec<Option<RecognitionResult>>,
        final_text: impl Into<String>,
    ) -> Self {
        Self {
            script: script.into(),
            final_text: final_text.into(),
            expected_samples: None,
        }
    }

    /// A recognizer that never produces text.
    pub fn mute() -> Self {
        Self::new(Vec::new(), "")
    }

    /// Enforce the negotiated frame geometry on every fed frame.
    pub fn with_expected_samples(mut self, samples: usize) -> Self {
        self.expected_samples = Some(samples);
        self
    }
}

impl RecognizerPort for ScriptedRecognizer {
    fn accept_frame(
        &mut self,
        frame: &AudioFrame,
    ) -> Result<Option<RecognitionResult>, RecognizerError> {
        if let Some(expected) = self.expected_samples {
            if frame.samples.len() != expected {
                return Err(RecognizerError::FrameGeometry {
                    expected,
                    actual: frame.samples.len(),
                });
            }
        }
        Ok(self.script.pop_front().flatten())
    }

    fn finalize(&mut self) -> Result<RecognitionResult, RecognizerError> {
        Ok(RecognitionResult::final_text(self.final_text.clone()))
    }
}
