use crate::session::SessionState;
use thiserror::Error;

/// Audio device failures surfaced when opening or closing a capture source.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no input device found matching '{0}'")]
    NotFound(String),

    #[error("no default input device available")]
    NoDefaultDevice,

    #[error("device does not support {sample_rate} Hz / {channels}ch capture: {reason}")]
    UnsupportedFormat {
        sample_rate: u32,
        channels: u16,
        reason: String,
    },

    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Recognizer failures. Frame geometry violations are fatal to the session:
/// the negotiated audio contract is broken, not a transient condition.
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("frame geometry mismatch: expected {expected} samples, got {actual}")]
    FrameGeometry { expected: usize, actual: usize },

    #[error("recognizer engine error: {0}")]
    Engine(String),
}

/// Errors surfaced by the session API.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Recognizer(#[from] RecognizerError),

    #[error("invalid session state: expected {expected}, was {actual}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    #[error("session task failed: {0}")]
    TaskFailed(String),
}
