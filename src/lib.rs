pub mod audio;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;

pub use audio::{
    CaptureConfig, CpalMicrophone, DecodeError, DeviceId, MicrophoneBackend, MicrophoneFactory,
    RecordedFile, SampleBuffer,
};
pub use config::Config;
pub use error::RecorderError;
pub use session::{
    RecordingSession, RecordingState, SavedRecording, SessionConfig, SessionEvent, SessionStats,
};
pub use storage::{default_file_name, LocalStorage, Storage};
