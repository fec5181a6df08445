use std::path::PathBuf;

/// Notifications published by a recording session.
///
/// Hosts subscribe through `RecordingSession::subscribe`; delivery is
/// best-effort and a slow listener never blocks the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Capture began; the session is now `Recording`.
    Started { max_duration_secs: u32 },
    /// `stop` was accepted; finalization is underway.
    Stopped,
    /// The recording was written to disk.
    Saved { path: PathBuf },
    /// Finalization failed; the session is back in `Idle` and can retry.
    SaveFailed { message: String },
    /// The recording was discarded without writing.
    Aborted,
}
