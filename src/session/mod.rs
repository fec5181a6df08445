//! Recording session management
//!
//! This module provides the `RecordingSession` state machine that manages:
//! - Microphone capture start/stop
//! - Elapsed-time tracking via host-driven ticks
//! - Trimming and WAV encoding of the captured buffer
//! - Writing the result through the storage seam
//! - Session notifications for interested listeners

mod config;
mod events;
mod session;
mod stats;

pub use config::SessionConfig;
pub use events::SessionEvent;
pub use session::{RecordingSession, RecordingState};
pub use stats::{SavedRecording, SessionStats};
