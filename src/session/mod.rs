//! Streaming capture session management
//!
//! This module provides the `StreamingSession` abstraction that manages:
//! - Audio source lifecycle (microphone or file capture)
//! - The bounded frame queue between producer and consumer
//! - Feeding the streaming recognizer in strict frame order
//! - Silence-timeout based termination
//! - Transcript accumulation and session statistics

mod config;
mod session;
mod silence;
mod stats;
mod transcript;

pub use config::SessionConfig;
pub use session::{SessionState, StreamingSession};
pub use silence::SilenceTracker;
pub use stats::SessionStats;
pub use transcript::Transcript;
