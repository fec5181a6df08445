use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use voicepad::{
    default_file_name, CaptureConfig, Config, DeviceId, LocalStorage, MicrophoneFactory,
    RecordedFile, RecordingSession, SessionConfig,
};

#[derive(Parser)]
#[command(name = "voicepad")]
#[command(about = "Record microphone audio to canonical PCM WAV files")]
struct Cli {
    /// Config file (TOML); built-in defaults are used when omitted
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available capture devices
    Devices,

    /// Record until the maximum duration elapses or ctrl-c
    Record {
        /// Base name for the saved file (default: timestamped "Audio ...")
        #[arg(long)]
        name: Option<String>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Maximum duration in seconds
        #[arg(long)]
        duration: Option<u32>,

        /// Capture device name (default: first available)
        #[arg(long)]
        device: Option<String>,
    },

    /// Print metadata of a recorded WAV file
    Inspect {
        path: PathBuf,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct InspectReport {
    path: String,
    duration_seconds: f64,
    sample_rate: u32,
    channels: u16,
    sample_count: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Devices => list_devices(),
        Command::Record {
            name,
            output,
            duration,
            device,
        } => record(&cfg, name, output, duration, device).await,
        Command::Inspect { path, json } => inspect(&path, json).await,
    }
}

fn list_devices() -> Result<()> {
    let microphone = MicrophoneFactory::create(CaptureConfig::default())?;
    let devices = microphone.devices();

    if devices.is_empty() {
        println!("No capture devices found");
    } else {
        for device in devices {
            println!("{device}");
        }
    }

    Ok(())
}

async fn record(
    cfg: &Config,
    name: Option<String>,
    output: Option<PathBuf>,
    duration: Option<u32>,
    device: Option<String>,
) -> Result<()> {
    let capture = CaptureConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
    };
    let microphone = MicrophoneFactory::create(capture)?;
    let storage = Arc::new(LocalStorage::new());
    let mut session = RecordingSession::new(
        microphone,
        storage,
        SessionConfig {
            sample_rate: cfg.audio.sample_rate,
            channels: cfg.audio.channels,
        },
    );

    let max_duration = duration.unwrap_or(cfg.audio.max_duration_secs);
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.audio.recordings_path));
    let name = name.unwrap_or_else(|| default_file_name("Audio", Utc::now()));

    session.start(device.map(DeviceId), max_duration).await?;
    info!("Recording for up to {}s, press ctrl-c to stop early", max_duration);

    // Host-side clock: the session only counts the time we feed it.
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut last = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                session.tick(now.duration_since(last).as_secs_f32());
                last = now;

                if session.should_stop() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, finalizing recording");
                break;
            }
        }
    }

    match session.stop(&name, &output).await {
        Ok(saved) => println!("Audio saved at {}", saved.path.display()),
        Err(e) => println!("Something went wrong while saving audio file: {e}"),
    }

    Ok(())
}

async fn inspect(path: &Path, json: bool) -> Result<()> {
    let storage = LocalStorage::new();
    let file = RecordedFile::load(&storage, path).await?;

    if json {
        let report = InspectReport {
            path: file.path,
            duration_seconds: file.duration_seconds,
            sample_rate: file.buffer.sample_rate,
            channels: file.buffer.channels,
            sample_count: file.buffer.len(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Path: {}", file.path);
        println!("Duration: {:.2}s", file.duration_seconds);
        println!("Sample rate: {} Hz", file.buffer.sample_rate);
        println!("Channels: {}", file.buffer.channels);
        println!("Samples: {}", file.buffer.len());
    }

    Ok(())
}
