use super::session::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current lifecycle state
    pub state: SessionState,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Number of audio frames fed to the recognizer
    pub frames_processed: usize,

    /// Number of frames dropped by the queue overflow policy
    pub frames_dropped: u64,

    /// Number of committed transcript fragments
    pub committed_fragments: usize,

    /// Number of provisional (partial) recognizer results observed
    pub partial_results: usize,
}
