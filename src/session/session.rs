use super::config::SessionConfig;
use super::silence::SilenceTracker;
use super::stats::SessionStats;
use super::transcript::Transcript;
use crate::audio::{AudioSource, FrameQueue};
use crate::error::SessionError;
use crate::recognizer::RecognizerPort;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Session lifecycle state.
///
/// Transitions are monotonic: `Idle → Listening → Draining → Terminated`.
/// `Terminated` is final; a new session must be constructed per capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Listening,
    Draining,
    Terminated,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Listening,
            2 => Self::Draining,
            _ => Self::Terminated,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

// Control flag values shared between the consumer loop and outside callers.
const CONTROL_RUN: u8 = 0;
const CONTROL_STOP: u8 = 1;
const CONTROL_CANCEL: u8 = 2;

#[derive(Default)]
struct Counters {
    frames_processed: AtomicUsize,
    committed_fragments: AtomicUsize,
    partial_results: AtomicUsize,
}

/// A streaming capture session: audio source → frame queue → recognizer →
/// transcript.
///
/// One producer context (the source's callback thread) and one consumer loop
/// per session. The loop pops frames with a bounded wait, feeds the
/// recognizer in strict arrival order, commits non-empty final hypotheses,
/// and terminates on silence timeout, `stop()`, or `cancel()`.
pub struct StreamingSession {
    config: SessionConfig,
    queue: Arc<FrameQueue>,
    state: Arc<AtomicU8>,
    control: Arc<AtomicU8>,
    counters: Arc<Counters>,
    started_at: chrono::DateTime<chrono::Utc>,

    /// Source and recognizer are held until `start()` hands them to the
    /// consumer loop
    source: Mutex<Option<Box<dyn AudioSource>>>,
    recognizer: Mutex<Option<Box<dyn RecognizerPort>>>,

    /// Handle for the consumer loop task
    task_handle: tokio::sync::Mutex<Option<JoinHandle<Result<String, SessionError>>>>,
}

impl StreamingSession {
    /// Create a new session around an audio source and a ready-to-use
    /// recognizer.
    pub fn new(
        config: SessionConfig,
        source: Box<dyn AudioSource>,
        recognizer: Box<dyn RecognizerPort>,
    ) -> Self {
        let queue = Arc::new(FrameQueue::new(config.queue_capacity));
        Self {
            config,
            queue,
            state: Arc::new(AtomicU8::new(SessionState::Idle as u8)),
            control: Arc::new(AtomicU8::new(CONTROL_RUN)),
            counters: Arc::new(Counters::default()),
            started_at: Utc::now(),
            source: Mutex::new(Some(source)),
            recognizer: Mutex::new(Some(recognizer)),
            task_handle: tokio::sync::Mutex::new(None),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Start capturing.
    ///
    /// Opens the audio source and spawns the consumer loop. Fails with
    /// `DeviceError` if the device cannot be opened (the session stays
    /// `Idle`) and with `InvalidState` when called on a session that already
    /// ran: one session per capture.
    pub async fn start(&self) -> Result<(), SessionError> {
        let actual = self.state();
        if actual != SessionState::Idle {
            return Err(SessionError::InvalidState {
                expected: SessionState::Idle,
                actual,
            });
        }

        // Taking both halves under their locks is what makes a concurrent
        // second start() lose cleanly.
        let (mut source, recognizer) = {
            let mut source_slot = self.source.lock().unwrap_or_else(|e| e.into_inner());
            let mut recognizer_slot = self.recognizer.lock().unwrap_or_else(|e| e.into_inner());
            match (source_slot.take(), recognizer_slot.take()) {
                (Some(source), Some(recognizer)) => (source, recognizer),
                _ => {
                    return Err(SessionError::InvalidState {
                        expected: SessionState::Idle,
                        actual: self.state(),
                    })
                }
            }
        };

        info!(
            "Starting capture session: {} ({} Hz, {}ch, silence timeout {:?})",
            self.config.session_id,
            self.config.sample_rate,
            self.config.channels,
            self.config.silence_timeout
        );

        if let Err(e) = source.start(Arc::clone(&self.queue)) {
            // Session never transitions past Idle on a device failure.
            *self.source.lock().unwrap_or_else(|e| e.into_inner()) = Some(source);
            *self.recognizer.lock().unwrap_or_else(|e| e.into_inner()) = Some(recognizer);
            return Err(e.into());
        }

        self.state
            .store(SessionState::Listening as u8, Ordering::SeqCst);

        let worker = ConsumerLoop {
            config: self.config.clone(),
            queue: Arc::clone(&self.queue),
            state: Arc::clone(&self.state),
            control: Arc::clone(&self.control),
            counters: Arc::clone(&self.counters),
            source,
            recognizer,
        };

        // The loop blocks on the queue condvar and on recognizer CPU work,
        // so it runs on the blocking pool rather than an async task.
        let handle = tokio::task::spawn_blocking(move || worker.run());

        {
            let mut task_handle = self.task_handle.lock().await;
            *task_handle = Some(handle);
        }

        Ok(())
    }

    /// Request a graceful stop.
    ///
    /// Thread-safe and idempotent; only flags the transition. Teardown
    /// happens on the consumer loop's own thread, within one poll interval.
    pub fn stop(&self) {
        if self
            .control
            .compare_exchange(CONTROL_RUN, CONTROL_STOP, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Stop requested for session {}", self.config.session_id);
        }
    }

    /// Like `stop()`, but the accumulated transcript is discarded and
    /// `await_result()` yields an empty string.
    pub fn cancel(&self) {
        let previous = self.control.swap(CONTROL_CANCEL, Ordering::SeqCst);
        if previous != CONTROL_CANCEL {
            info!("Cancel requested for session {}", self.config.session_id);
        }
    }

    /// Wait for the session to terminate and return the trimmed transcript.
    pub async fn await_result(&self) -> Result<String, SessionError> {
        let handle = {
            let mut task_handle = self.task_handle.lock().await;
            task_handle.take()
        };

        match handle {
            Some(handle) => handle
                .await
                .map_err(|e| SessionError::TaskFailed(e.to_string()))?,
            None => Err(SessionError::InvalidState {
                expected: SessionState::Listening,
                actual: self.state(),
            }),
        }
    }

    /// Current session statistics
    pub fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);
        SessionStats {
            state: self.state(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            frames_processed: self.counters.frames_processed.load(Ordering::Relaxed),
            frames_dropped: self.queue.overflow_count(),
            committed_fragments: self.counters.committed_fragments.load(Ordering::Relaxed),
            partial_results: self.counters.partial_results.load(Ordering::Relaxed),
        }
    }
}

/// The single consumer of a session's frame queue.
struct ConsumerLoop {
    config: SessionConfig,
    queue: Arc<FrameQueue>,
    state: Arc<AtomicU8>,
    control: Arc<AtomicU8>,
    counters: Arc<Counters>,
    source: Box<dyn AudioSource>,
    recognizer: Box<dyn RecognizerPort>,
}

impl ConsumerLoop {
    fn run(mut self) -> Result<String, SessionError> {
        let mut transcript = Transcript::new();
        let mut silence = SilenceTracker::new(Instant::now());

        loop {
            if self.control.load(Ordering::SeqCst) != CONTROL_RUN {
                break;
            }

            if let Some(frame) = self.queue.pop(self.config.poll_interval) {
                self.counters
                    .frames_processed
                    .fetch_add(1, Ordering::Relaxed);

                match self.recognizer.accept_frame(&frame) {
                    Ok(Some(result)) => {
                        if result.is_final {
                            let text = result.text.trim();
                            if !text.is_empty() {
                                info!("Committed utterance: {}", text);
                                transcript.push(text);
                                silence.mark_activity(Instant::now());
                                self.counters
                                    .committed_fragments
                                    .fetch_add(1, Ordering::Relaxed);
                            }
                        } else {
                            debug!("Partial hypothesis: {}", result.text);
                            self.counters
                                .partial_results
                                .fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    Ok(None) => {} // recognizer needs more audio
                    Err(e) => {
                        // Fatal: the audio contract is broken. Abort straight
                        // to Terminated with the error instead of a
                        // transcript.
                        error!("Recognizer failed: {}", e);
                        if let Err(stop_err) = self.source.stop() {
                            warn!("Failed to stop audio source: {}", stop_err);
                        }
                        self.state
                            .store(SessionState::Terminated as u8, Ordering::SeqCst);
                        return Err(e.into());
                    }
                }
            }

            // The silence check runs after frame processing, never before:
            // an utterance committed right at the boundary still lands in
            // the transcript.
            if silence.timed_out(Instant::now(), self.config.silence_timeout) {
                info!(
                    "Silence timeout reached after {:?} without activity",
                    silence.since_activity(Instant::now())
                );
                break;
            }
        }

        self.drain(transcript)
    }

    /// Terminal phase: no new audio is accepted, pending recognizer state is
    /// flushed.
    fn drain(mut self, mut transcript: Transcript) -> Result<String, SessionError> {
        self.state
            .store(SessionState::Draining as u8, Ordering::SeqCst);

        if let Err(e) = self.source.stop() {
            warn!("Failed to stop audio source: {}", e);
        }

        let cancelled = self.control.load(Ordering::SeqCst) == CONTROL_CANCEL;

        // finalize() is called exactly once, even when cancelling, since the
        // port contract allows no second chance; its text is simply dropped
        // on cancel.
        let final_result = match self.recognizer.finalize() {
            Ok(result) => result,
            Err(e) => {
                error!("Recognizer finalize failed: {}", e);
                self.state
                    .store(SessionState::Terminated as u8, Ordering::SeqCst);
                return Err(e.into());
            }
        };

        if !cancelled {
            transcript.push(&final_result.text);
        }

        self.state
            .store(SessionState::Terminated as u8, Ordering::SeqCst);

        if cancelled {
            info!("Session cancelled, transcript discarded");
            return Ok(String::new());
        }

        let text = transcript.finish();
        info!(
            "Session terminated with {} committed fragment(s)",
            transcript.len()
        );
        Ok(text)
    }
}
