use super::source::AudioFrame;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;
use tracing::warn;

/// Bounded FIFO buffer between the audio callback and the consumer loop.
///
/// `push` never blocks the producer: at capacity the oldest pending frame is
/// dropped and counted. Silence detection tolerates a small gap better than
/// a stalled audio callback, so latency wins over completeness here.
///
/// Frames come out of `pop` in the exact order they were pushed; the only
/// frames ever lost are the oldest ones evicted by overflow.
pub struct FrameQueue {
    inner: Mutex<VecDeque<AudioFrame>>,
    not_empty: Condvar,
    capacity: usize,
    overflow_count: AtomicU64,
}

impl FrameQueue {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be non-zero");
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
            capacity,
            overflow_count: AtomicU64::new(0),
        }
    }

    /// Enqueue a frame from the producer context. Never blocks beyond the
    /// short lock hold; drops the oldest pending frame when full.
    pub fn push(&self, frame: AudioFrame) {
        let mut queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if queue.len() >= self.capacity {
            queue.pop_front();
            let dropped = self.overflow_count.fetch_add(1, Ordering::Relaxed) + 1;
            warn!("Frame queue overflow, dropped oldest frame (total dropped: {})", dropped);
        }

        queue.push_back(frame);
        drop(queue);
        self.not_empty.notify_one();
    }

    /// Dequeue the next frame, waiting up to `timeout`. Returns `None` when
    /// the wait expires with no data; that is the expected idle signal, not
    /// an error.
    pub fn pop(&self, timeout: Duration) -> Option<AudioFrame> {
        let mut queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let deadline = std::time::Instant::now() + timeout;

        while queue.is_empty() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, wait) = self
                .not_empty
                .wait_timeout(queue, remaining)
                .unwrap_or_else(|e| e.into_inner());
            queue = guard;
            if wait.timed_out() && queue.is_empty() {
                return None;
            }
        }

        queue.pop_front()
    }

    /// Number of frames currently buffered
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total frames dropped by the overflow policy since creation
    pub fn overflow_count(&self) -> u64 {
        self.overflow_count.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
