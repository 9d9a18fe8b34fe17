use std::time::{Duration, Instant};

/// Tracks elapsed time since the last committed utterance.
///
/// The authority for "has the user stopped talking": pure timestamp
/// arithmetic, no I/O. Initialized at session start, so a session that never
/// hears speech still times out after the configured window of total
/// silence.
#[derive(Debug, Clone, Copy)]
pub struct SilenceTracker {
    last_activity: Instant,
}

impl SilenceTracker {
    pub fn new(now: Instant) -> Self {
        Self { last_activity: now }
    }

    /// Record a committed non-empty utterance.
    pub fn mark_activity(&mut self, now: Instant) {
        self.last_activity = now;
    }

    /// Time elapsed since the last committed utterance (or session start).
    pub fn since_activity(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    /// Whether the silence window has been exhausted.
    pub fn timed_out(&self, now: Instant, timeout: Duration) -> bool {
        self.since_activity(now) >= timeout
    }
}
