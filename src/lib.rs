pub mod audio;
pub mod config;
pub mod error;
pub mod recognizer;
pub mod session;

pub use audio::{AudioFrame, AudioSource, FrameQueue, MicSource, SourceConfig, WavSource};
pub use config::Config;
pub use error::{DeviceError, RecognizerError, SessionError};
pub use recognizer::{RecognitionResult, RecognizerPort};
pub use session::{
    SessionConfig, SessionState, SessionStats, SilenceTracker, StreamingSession, Transcript,
};
