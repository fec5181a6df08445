use std::path::PathBuf;

use thiserror::Error;

use crate::audio::codec::DecodeError;

/// Errors surfaced by recording, saving, and loading operations.
///
/// Every fallible operation in this crate returns one of these; nothing is
/// panicked across the library boundary. The session is guaranteed to be back
/// in `Idle` after a failed stop, so callers can always retry.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// No capture device was found when starting a recording.
    #[error("no capture device available")]
    NoDeviceAvailable,

    /// `start` was called while a recording was already in progress.
    #[error("a recording is already in progress")]
    AlreadyRecording,

    /// `stop` (or `abort`) was called without an active recording.
    #[error("no recording in progress")]
    NotRecording,

    /// The maximum recording duration must be positive.
    #[error("recording duration must be positive")]
    InvalidDuration,

    /// The path passed to a load operation does not exist.
    #[error("audio file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The capture backend failed to build or run its input stream.
    #[error("audio capture failed: {0}")]
    CaptureFailed(String),

    /// The bytes being loaded are not a canonical PCM WAV file.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A file write, read, or delete failed.
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
}
