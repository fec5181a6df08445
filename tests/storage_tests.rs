// Integration tests for local storage and the load path.

use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;
use voicepad::audio::codec;
use voicepad::{DecodeError, LocalStorage, RecordedFile, RecorderError, SampleBuffer, Storage};

#[tokio::test]
async fn test_local_storage_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new();
    let path = temp_dir.path().join("clip.bin");

    assert!(!storage.exists(&path).await);

    storage.write_bytes(&path, b"abc123").await?;
    assert!(storage.exists(&path).await);
    assert_eq!(storage.read_bytes(&path).await?, b"abc123");

    storage.delete(&path).await?;
    assert!(!storage.exists(&path).await);

    Ok(())
}

#[tokio::test]
async fn test_write_creates_parent_directories() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new();
    let path = temp_dir.path().join("nested").join("deeper").join("clip.wav");

    storage.write_bytes(&path, &[0u8; 4]).await?;

    assert!(storage.exists(&path).await);

    Ok(())
}

#[tokio::test]
async fn test_load_missing_file_is_file_not_found() {
    let storage = LocalStorage::new();
    let path = PathBuf::from("/nonexistent/path/to/audio.wav");

    let result = RecordedFile::load(&storage, &path).await;

    match result {
        Err(RecorderError::FileNotFound(missing)) => assert_eq!(missing, path),
        other => panic!("expected FileNotFound, got {:?}", other.map(|f| f.path)),
    }
}

#[tokio::test]
async fn test_load_rejects_garbage_bytes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new();
    let path = temp_dir.path().join("garbage.wav");

    storage
        .write_bytes(&path, b"this is definitely not a wav file, not even close")
        .await?;

    let result = RecordedFile::load(&storage, &path).await;

    assert!(matches!(
        result,
        Err(RecorderError::Decode(DecodeError::MalformedHeader(_)))
    ));

    Ok(())
}

#[tokio::test]
async fn test_load_round_trips_an_encoded_buffer() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new();
    let path = temp_dir.path().join("tone.wav");

    let samples: Vec<f32> = (0..44100).map(|i| (i as f32 * 0.02).sin() * 0.5).collect();
    let buffer = SampleBuffer::new(samples, 1, 44100);
    storage.write_bytes(&path, &codec::encode(&buffer)).await?;

    let file = RecordedFile::load(&storage, &path).await?;

    assert_eq!(file.buffer.len(), 44100);
    assert_eq!(file.buffer.channels, 1);
    assert_eq!(file.buffer.sample_rate, 44100);
    assert!((file.duration_seconds - 1.0).abs() < 1e-9);

    Ok(())
}
