// Integration tests for the recording session state machine
//
// These drive the session the way a host would: start, feed ticks from an
// external clock, stop, and inspect the typed outcome. Capture is a scripted
// mock; files land in a temp directory.

mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{FailingStorage, MockMicrophone};
use tempfile::TempDir;
use voicepad::{
    LocalStorage, RecordedFile, RecorderError, RecordingSession, RecordingState, SessionConfig,
    SessionEvent,
};

fn session_with(microphone: MockMicrophone, storage: Arc<dyn voicepad::Storage>) -> RecordingSession {
    RecordingSession::new(Box::new(microphone), storage, SessionConfig::default())
}

#[tokio::test]
async fn test_stop_halfway_saves_half_the_audio() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = Arc::new(LocalStorage::new());
    let mut session = session_with(MockMicrophone::new(), storage.clone());

    session.start(None, 10).await?;
    assert_eq!(session.state(), RecordingState::Recording);

    session.tick(5.0);

    let saved = session.stop("Audio", temp_dir.path()).await?;

    assert_eq!(session.state(), RecordingState::Idle);
    assert!(saved.path.ends_with("Audio.wav"));
    assert!((saved.duration_seconds - 5.0).abs() < 0.01);

    // Half of the 10s capture buffer survives the trim.
    let file = RecordedFile::load(storage.as_ref(), &saved.path).await?;
    assert_eq!(file.buffer.len(), 44100 * 5);
    assert_eq!(file.buffer.channels, 1);
    assert_eq!(file.buffer.sample_rate, 44100);

    Ok(())
}

#[tokio::test]
async fn test_full_duration_recording_is_not_trimmed() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = Arc::new(LocalStorage::new());
    let mut session = session_with(MockMicrophone::new(), storage.clone());

    session.start(None, 2).await?;
    session.tick(1.0);
    session.tick(1.0);
    assert!(session.should_stop());

    let saved = session.stop("Full", temp_dir.path()).await?;

    let file = RecordedFile::load(storage.as_ref(), &saved.path).await?;
    assert_eq!(file.buffer.len(), 44100 * 2);

    Ok(())
}

#[tokio::test]
async fn test_stop_while_idle_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = session_with(MockMicrophone::new(), Arc::new(LocalStorage::new()));

    let result = session.stop("Audio", temp_dir.path()).await;

    assert!(matches!(result, Err(RecorderError::NotRecording)));
    assert_eq!(session.state(), RecordingState::Idle);
}

#[tokio::test]
async fn test_start_while_recording_is_rejected() -> Result<()> {
    let mut session = session_with(MockMicrophone::new(), Arc::new(LocalStorage::new()));

    session.start(None, 10).await?;
    let second = session.start(None, 10).await;

    assert!(matches!(second, Err(RecorderError::AlreadyRecording)));
    assert_eq!(session.state(), RecordingState::Recording);

    Ok(())
}

#[tokio::test]
async fn test_zero_duration_is_rejected() {
    let mut session = session_with(MockMicrophone::new(), Arc::new(LocalStorage::new()));

    let result = session.start(None, 0).await;

    assert!(matches!(result, Err(RecorderError::InvalidDuration)));
    assert_eq!(session.state(), RecordingState::Idle);
}

#[tokio::test]
async fn test_start_without_device_fails() {
    let mut session = session_with(MockMicrophone::unavailable(), Arc::new(LocalStorage::new()));

    let result = session.start(None, 10).await;

    assert!(matches!(result, Err(RecorderError::NoDeviceAvailable)));
    assert_eq!(session.state(), RecordingState::Idle);
}

#[tokio::test]
async fn test_failed_save_returns_to_idle_and_allows_retry() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut session = session_with(MockMicrophone::new(), Arc::new(FailingStorage));

    session.start(None, 5).await?;
    session.tick(1.0);

    let result = session.stop("Audio", temp_dir.path()).await;

    assert!(matches!(result, Err(RecorderError::Io(_))));
    // A failed save must never strand the session.
    assert_eq!(session.state(), RecordingState::Idle);

    session.start(None, 5).await?;
    assert_eq!(session.state(), RecordingState::Recording);

    Ok(())
}

#[tokio::test]
async fn test_events_are_published_in_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut session = session_with(MockMicrophone::new(), Arc::new(LocalStorage::new()));
    let mut events = session.subscribe();

    session.start(None, 10).await?;
    session.tick(2.0);
    session.stop("Audio", temp_dir.path()).await?;

    assert!(matches!(
        events.try_recv()?,
        SessionEvent::Started {
            max_duration_secs: 10
        }
    ));
    assert!(matches!(events.try_recv()?, SessionEvent::Stopped));
    assert!(matches!(events.try_recv()?, SessionEvent::Saved { .. }));

    Ok(())
}

#[tokio::test]
async fn test_failed_save_publishes_save_failed() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut session = session_with(MockMicrophone::new(), Arc::new(FailingStorage));
    let mut events = session.subscribe();

    session.start(None, 5).await?;
    session.tick(1.0);
    let _ = session.stop("Audio", temp_dir.path()).await;

    assert!(matches!(events.try_recv()?, SessionEvent::Started { .. }));
    assert!(matches!(events.try_recv()?, SessionEvent::Stopped));
    match events.try_recv()? {
        SessionEvent::SaveFailed { message } => assert!(!message.is_empty()),
        other => panic!("expected SaveFailed, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_abort_discards_without_writing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut session = session_with(MockMicrophone::new(), Arc::new(LocalStorage::new()));

    session.start(None, 10).await?;
    session.tick(3.0);
    session.abort().await?;

    assert_eq!(session.state(), RecordingState::Idle);
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_tick_outside_recording_is_ignored() {
    let mut session = session_with(MockMicrophone::new(), Arc::new(LocalStorage::new()));

    session.tick(5.0);

    assert_eq!(session.elapsed_secs(), 0.0);
    assert!(!session.should_stop());
}

#[tokio::test]
async fn test_stats_track_session_progress() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut session = session_with(MockMicrophone::new(), Arc::new(LocalStorage::new()));

    assert!(!session.is_recording());
    assert_eq!(session.stats().state, RecordingState::Idle);

    session.start(None, 10).await?;
    session.tick(2.5);

    assert!(session.is_recording());
    let stats = session.stats();
    assert_eq!(stats.state, RecordingState::Recording);
    assert_eq!(stats.elapsed_secs, 2.5);
    assert_eq!(stats.max_duration_secs, 10);

    session.stop("Audio", temp_dir.path()).await?;
    assert_eq!(session.stats().state, RecordingState::Idle);

    Ok(())
}

#[tokio::test]
async fn test_stop_overwrites_previous_recording() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = Arc::new(LocalStorage::new());

    let mut session = session_with(MockMicrophone::new(), storage.clone());
    session.start(None, 4).await?;
    session.tick(4.0);
    let first = session.stop("Audio", temp_dir.path()).await?;

    session.start(None, 4).await?;
    session.tick(2.0);
    let second = session.stop("Audio", temp_dir.path()).await?;

    assert_eq!(first.path, second.path);

    // The shorter second take replaced the first file.
    let file = RecordedFile::load(storage.as_ref(), &second.path).await?;
    assert_eq!(file.buffer.len(), 44100 * 2);

    Ok(())
}
