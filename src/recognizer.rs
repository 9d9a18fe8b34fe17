use crate::audio::AudioFrame;
use crate::error::RecognizerError;

/// One recognizer hypothesis.
///
/// Provisional results (`is_final == false`) may be superseded by a later
/// result covering overlapping audio and are never committed to a
/// transcript. Final results are committed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub text: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Streaming speech recognizer boundary
///
/// Wraps an external engine that is already loaded and ready; model
/// selection and caching happen elsewhere. The engine consumes fixed-geometry
/// PCM frames in strict arrival order and emits hypotheses as it goes.
pub trait RecognizerPort: Send {
    /// Feed one frame of audio.
    ///
    /// `Ok(None)` means the engine needs more audio; that is the common case,
    /// not a failure. A frame whose sample count does not match the
    /// negotiated geometry is a `RecognizerError::FrameGeometry`, which is
    /// fatal to the session: the audio contract is violated, not a transient
    /// condition, so it is never retried.
    fn accept_frame(&mut self, frame: &AudioFrame)
        -> Result<Option<RecognitionResult>, RecognizerError>;

    /// Flush remaining engine state and return the closing hypothesis.
    ///
    /// Called exactly once per session, during drain; the port is unusable
    /// afterwards.
    fn finalize(&mut self) -> Result<RecognitionResult, RecognizerError>;
}
