pub mod mic;
pub mod queue;
pub mod source;
pub mod wav;

pub use mic::MicSource;
pub use queue::FrameQueue;
pub use source::{AudioFrame, AudioSource, SourceConfig};
pub use wav::WavSource;
