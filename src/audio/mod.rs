pub mod backend;
pub mod buffer;
pub mod codec;
pub mod cpal;
pub mod file;
pub mod trim;

pub use backend::{CaptureConfig, DeviceId, MicrophoneBackend, MicrophoneFactory};
pub use buffer::SampleBuffer;
pub use codec::DecodeError;
pub use file::RecordedFile;
pub use trim::trim_trailing_silence;

pub use self::cpal::CpalMicrophone;
