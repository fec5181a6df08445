// Quick end-to-end test: record a short clip and load it back
//
// Records 5 seconds from the default capture device, saves a WAV file to
// ./recordings, then decodes the file and prints what landed on disk.
//
// Run with: cargo run --example record_clip

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use voicepad::{
    default_file_name, CaptureConfig, LocalStorage, MicrophoneFactory, RecordedFile,
    RecordingSession, SessionConfig, SessionEvent,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== voicepad: 5-second recording test ===\n");

    let microphone = MicrophoneFactory::create(CaptureConfig::default())?;
    let devices = microphone.devices();
    if devices.is_empty() {
        eprintln!("No capture devices found");
        return Ok(());
    }
    println!("Capture devices:");
    for device in &devices {
        println!("  - {device}");
    }

    let storage = Arc::new(LocalStorage::new());
    let mut session = RecordingSession::new(microphone, storage.clone(), SessionConfig::default());

    // Watch the session's notifications on the side.
    let mut events = session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::Started { max_duration_secs } => {
                    println!("  [event] recording started (max {max_duration_secs}s)")
                }
                SessionEvent::Stopped => println!("  [event] finalizing"),
                SessionEvent::Saved { path } => println!("  [event] saved {}", path.display()),
                SessionEvent::SaveFailed { message } => println!("  [event] failed: {message}"),
                SessionEvent::Aborted => println!("  [event] aborted"),
            }
        }
    });

    println!("\nRecording for 5 seconds, speak now!\n");
    session.start(None, 5).await?;

    // The session only counts the time its host feeds it.
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut last = Instant::now();
    while !session.should_stop() {
        ticker.tick().await;
        let now = Instant::now();
        session.tick(now.duration_since(last).as_secs_f32());
        last = now;
    }

    let name = default_file_name("Audio", Utc::now());
    let output = PathBuf::from("recordings");

    match session.stop(&name, &output).await {
        Ok(saved) => {
            println!("\nAudio saved at {}", saved.path.display());

            let file = RecordedFile::load(storage.as_ref(), &saved.path).await?;
            println!("Read back from disk:");
            println!("  Duration: {:.2}s", file.duration_seconds);
            println!("  Sample rate: {} Hz", file.buffer.sample_rate);
            println!("  Channels: {}", file.buffer.channels);
            println!("  Samples: {}", file.buffer.len());
        }
        Err(e) => println!("Something went wrong while saving audio file: {e}"),
    }

    Ok(())
}
