use std::path::PathBuf;

use serde::Serialize;

use super::session::RecordingState;

/// Snapshot of a recording session's progress
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Current state of the session
    pub state: RecordingState,

    /// Seconds of audio recorded so far
    pub elapsed_secs: f32,

    /// Maximum duration of the current (or last) recording
    pub max_duration_secs: u32,
}

/// The success payload of a save: where the recording landed and what it
/// contains.
#[derive(Debug, Clone, Serialize)]
pub struct SavedRecording {
    /// Path of the written WAV file
    pub path: PathBuf,

    /// Duration of the trimmed audio in seconds
    pub duration_seconds: f64,

    /// Total samples written (across all channels)
    pub sample_count: usize,
}
