use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::config::SessionConfig;
use super::events::SessionEvent;
use super::stats::{SavedRecording, SessionStats};
use crate::audio::backend::{DeviceId, MicrophoneBackend};
use crate::audio::buffer::SampleBuffer;
use crate::audio::codec;
use crate::audio::trim::trim_trailing_silence;
use crate::error::RecorderError;
use crate::storage::Storage;

/// Lifecycle of a recording session.
///
/// `Finalizing` exists so that a second `stop` racing the duration boundary
/// is rejected instead of re-triggering a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordingState {
    Idle,
    Recording,
    Finalizing,
}

/// A recording session that manages capture, elapsed-time tracking, and
/// finalization of the captured audio into a WAV file on storage.
///
/// The session is driven cooperatively by its host: `tick` from a periodic
/// loop while recording, `stop` when the user (or the duration boundary)
/// says so. It owns its capture backend exclusively for the whole session.
pub struct RecordingSession {
    config: SessionConfig,
    microphone: Box<dyn MicrophoneBackend>,
    storage: Arc<dyn Storage>,
    state: RecordingState,
    elapsed_secs: f32,
    max_duration_secs: u32,
    events: broadcast::Sender<SessionEvent>,
}

impl RecordingSession {
    pub fn new(
        microphone: Box<dyn MicrophoneBackend>,
        storage: Arc<dyn Storage>,
        config: SessionConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(16);

        Self {
            config,
            microphone,
            storage,
            state: RecordingState::Idle,
            elapsed_secs: 0.0,
            max_duration_secs: 0,
            events,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            state: self.state,
            elapsed_secs: self.elapsed_secs,
            max_duration_secs: self.max_duration_secs,
        }
    }

    /// Subscribe to session notifications. Any number of listeners may
    /// subscribe; events are dropped for listeners that fall behind.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Start recording from `device` (or the first available one) for at
    /// most `max_duration_secs` seconds.
    ///
    /// Capture has genuinely begun once this returns Ok, so an immediate
    /// `tick` is always valid.
    pub async fn start(
        &mut self,
        device: Option<DeviceId>,
        max_duration_secs: u32,
    ) -> Result<(), RecorderError> {
        if self.state != RecordingState::Idle {
            warn!("Start rejected: recording already in progress");
            return Err(RecorderError::AlreadyRecording);
        }
        if max_duration_secs == 0 {
            return Err(RecorderError::InvalidDuration);
        }
        if !self.microphone.is_available() {
            warn!("Start rejected: no capture device found");
            return Err(RecorderError::NoDeviceAvailable);
        }

        let device = match device {
            Some(device) => device,
            None => self
                .microphone
                .devices()
                .into_iter()
                .next()
                .ok_or(RecorderError::NoDeviceAvailable)?,
        };

        self.microphone
            .start_capture(&device, max_duration_secs)
            .await?;

        self.max_duration_secs = max_duration_secs;
        self.elapsed_secs = 0.0;
        self.state = RecordingState::Recording;

        info!(
            "Recording started on '{}' via {} (max {}s)",
            device,
            self.microphone.name(),
            max_duration_secs
        );
        self.emit(SessionEvent::Started { max_duration_secs });

        Ok(())
    }

    /// Advance the session clock. A no-op outside `Recording`, so a host
    /// tick racing a concurrent stop never perturbs finalization.
    pub fn tick(&mut self, delta_secs: f32) {
        if self.state == RecordingState::Recording {
            self.elapsed_secs += delta_secs;
        }
    }

    /// Whether the host should trigger `stop`: the recording has reached
    /// its maximum duration. The session never stops itself.
    pub fn should_stop(&self) -> bool {
        self.state == RecordingState::Recording && self.elapsed_secs >= self.max_duration_secs as f32
    }

    /// Stop recording, trim the unrecorded tail, and write the WAV file to
    /// `directory/<file_name>.wav`.
    ///
    /// The session returns to `Idle` whether the save succeeds or fails;
    /// a failed save is always retryable with a fresh recording.
    pub async fn stop(
        &mut self,
        file_name: &str,
        directory: &Path,
    ) -> Result<SavedRecording, RecorderError> {
        if self.state != RecordingState::Recording {
            warn!("Stop rejected: no recording in progress");
            return Err(RecorderError::NotRecording);
        }

        // Reject re-entrant stops before the first await.
        self.state = RecordingState::Finalizing;
        self.emit(SessionEvent::Stopped);

        let path = directory.join(format!("{file_name}.wav"));
        let result = self.finalize(&path).await;

        // Never strand the session in Finalizing.
        self.state = RecordingState::Idle;

        match &result {
            Ok(saved) => {
                info!(
                    "Recording saved: {} ({:.1}s, {} samples)",
                    saved.path.display(),
                    saved.duration_seconds,
                    saved.sample_count
                );
                self.emit(SessionEvent::Saved {
                    path: saved.path.clone(),
                });
            }
            Err(e) => {
                warn!("Recording save failed: {}", e);
                self.emit(SessionEvent::SaveFailed {
                    message: e.to_string(),
                });
            }
        }

        result
    }

    /// Discard the current recording without writing anything.
    pub async fn abort(&mut self) -> Result<(), RecorderError> {
        if self.state != RecordingState::Recording {
            return Err(RecorderError::NotRecording);
        }

        self.state = RecordingState::Finalizing;
        let result = self.microphone.stop_capture().await.map(|_| ());
        self.state = RecordingState::Idle;

        info!("Recording aborted after {:.1}s", self.elapsed_secs);
        self.emit(SessionEvent::Aborted);

        result
    }

    /// The capture-to-file pipeline: read back the full buffer, trim the
    /// silent tail, encode, replace any previous file at the target path.
    async fn finalize(&mut self, path: &Path) -> Result<SavedRecording, RecorderError> {
        let raw = self.microphone.stop_capture().await?;
        let buffer = SampleBuffer::new(raw, self.config.channels, self.config.sample_rate);

        let trimmed = trim_trailing_silence(&buffer, self.elapsed_secs, self.max_duration_secs)?;
        let bytes = codec::encode(&trimmed);

        if self.storage.exists(path).await {
            self.storage.delete(path).await?;
        }
        self.storage.write_bytes(path, &bytes).await?;

        Ok(SavedRecording {
            path: PathBuf::from(path),
            duration_seconds: trimmed.duration_seconds(),
            sample_count: trimmed.len(),
        })
    }

    fn emit(&self, event: SessionEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}
