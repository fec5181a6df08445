// Microphone capture via cpal.
//
// cpal's Stream is not Send, so a dedicated thread owns the stream for the
// lifetime of one capture. Samples accumulate into a shared buffer capped at
// the pre-allocated capacity; the startup handshake reports device errors
// back to the caller before `start_capture` returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::sync::oneshot;
use tracing::{info, warn};

use super::backend::{CaptureConfig, DeviceId, MicrophoneBackend};
use crate::error::RecorderError;

pub struct CpalMicrophone {
    config: CaptureConfig,
    /// Captured samples, filled by the stream callback up to `capacity`
    buffer: Arc<Mutex<Vec<f32>>>,
    /// Capture flag, cleared to wind down the worker thread
    capturing: Arc<AtomicBool>,
    /// Full buffer size for the current capture (max duration worth)
    capacity: usize,
    worker: Option<JoinHandle<()>>,
}

impl CpalMicrophone {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            capturing: Arc::new(AtomicBool::new(false)),
            capacity: 0,
            worker: None,
        }
    }
}

#[async_trait]
impl MicrophoneBackend for CpalMicrophone {
    fn is_available(&self) -> bool {
        let host = cpal::default_host();
        host.default_input_device().is_some() || !self.devices().is_empty()
    }

    fn devices(&self) -> Vec<DeviceId> {
        let host = cpal::default_host();
        match host.input_devices() {
            Ok(devices) => devices
                .filter_map(|device| device.name().ok())
                .map(DeviceId)
                .collect(),
            Err(e) => {
                warn!("Failed to enumerate capture devices: {}", e);
                Vec::new()
            }
        }
    }

    async fn start_capture(
        &mut self,
        device: &DeviceId,
        max_duration_secs: u32,
    ) -> Result<(), RecorderError> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(RecorderError::AlreadyRecording);
        }

        let capacity = max_duration_secs as usize
            * self.config.sample_rate as usize
            * self.config.channels as usize;
        self.capacity = capacity;

        {
            let mut buf = self.buffer.lock().unwrap();
            buf.clear();
            buf.reserve(capacity);
        }
        self.capturing.store(true, Ordering::SeqCst);

        let (ready_tx, ready_rx) = oneshot::channel();
        let buffer = Arc::clone(&self.buffer);
        let capturing = Arc::clone(&self.capturing);
        let stream_config = StreamConfig {
            channels: self.config.channels,
            sample_rate: cpal::SampleRate(self.config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };
        let wanted = device.clone();

        let worker = std::thread::spawn(move || {
            let started = open_stream(&wanted, &stream_config, buffer, Arc::clone(&capturing), capacity);

            match started {
                Ok(stream) => {
                    let _ = ready_tx.send(Ok(()));
                    while capturing.load(Ordering::SeqCst) {
                        std::thread::sleep(Duration::from_millis(50));
                    }
                    drop(stream);
                }
                Err(e) => {
                    capturing.store(false, Ordering::SeqCst);
                    let _ = ready_tx.send(Err(e));
                }
            }
        });
        self.worker = Some(worker);

        match ready_rx.await {
            Ok(Ok(())) => {
                info!(
                    "Capture started on '{}': {}Hz, {} channels, capacity {} samples",
                    device, self.config.sample_rate, self.config.channels, capacity
                );
                Ok(())
            }
            Ok(Err(e)) => {
                self.reap_worker();
                Err(e)
            }
            Err(_) => {
                self.reap_worker();
                Err(RecorderError::CaptureFailed(
                    "capture thread exited before the stream started".to_string(),
                ))
            }
        }
    }

    async fn stop_capture(&mut self) -> Result<Vec<f32>, RecorderError> {
        if self.worker.is_none() {
            return Err(RecorderError::NotRecording);
        }

        self.capturing.store(false, Ordering::SeqCst);

        if let Some(worker) = self.worker.take() {
            tokio::task::spawn_blocking(move || worker.join())
                .await
                .map_err(|e| RecorderError::CaptureFailed(format!("worker join failed: {e}")))?
                .map_err(|_| {
                    RecorderError::CaptureFailed("capture thread panicked".to_string())
                })?;
        }

        let mut samples = std::mem::take(&mut *self.buffer.lock().unwrap());
        let recorded = samples.len();
        // Hand back the full pre-sized buffer; the tail stays silent.
        samples.resize(self.capacity, 0.0);

        info!(
            "Capture stopped: {} of {} samples recorded",
            recorded, self.capacity
        );

        Ok(samples)
    }

    fn name(&self) -> &str {
        "cpal"
    }
}

impl CpalMicrophone {
    /// Join a worker that failed during startup.
    fn reap_worker(&mut self) {
        self.capturing.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Resolve the device, build the input stream for its sample format, and
/// start it. Runs on the capture thread.
fn open_stream(
    wanted: &DeviceId,
    config: &StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    capturing: Arc<AtomicBool>,
    capacity: usize,
) -> Result<cpal::Stream, RecorderError> {
    let host = cpal::default_host();
    let device = find_device(&host, wanted)?;

    let sample_format = device
        .default_input_config()
        .map_err(|e| RecorderError::CaptureFailed(e.to_string()))?
        .sample_format();

    let stream = match sample_format {
        SampleFormat::F32 => device
            .build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    push_samples(&buffer, &capturing, capacity, data.iter().copied());
                },
                log_stream_error,
                None,
            )
            .map_err(|e| RecorderError::CaptureFailed(e.to_string()))?,

        SampleFormat::I16 => device
            .build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    push_samples(
                        &buffer,
                        &capturing,
                        capacity,
                        data.iter().map(|&s| s as f32 / 32767.0),
                    );
                },
                log_stream_error,
                None,
            )
            .map_err(|e| RecorderError::CaptureFailed(e.to_string()))?,

        other => {
            return Err(RecorderError::CaptureFailed(format!(
                "unsupported sample format: {other:?}"
            )))
        }
    };

    stream
        .play()
        .map_err(|e| RecorderError::CaptureFailed(e.to_string()))?;

    Ok(stream)
}

/// Pick the named device, falling back to the host default.
fn find_device(host: &cpal::Host, wanted: &DeviceId) -> Result<cpal::Device, RecorderError> {
    if let Ok(mut devices) = host.input_devices() {
        if let Some(device) =
            devices.find(|d| d.name().map(|n| n == wanted.0).unwrap_or(false))
        {
            return Ok(device);
        }
        warn!(
            "Capture device '{}' not found, falling back to default input",
            wanted
        );
    }

    host.default_input_device()
        .ok_or(RecorderError::NoDeviceAvailable)
}

fn push_samples<I>(
    buffer: &Mutex<Vec<f32>>,
    capturing: &AtomicBool,
    capacity: usize,
    samples: I,
) where
    I: Iterator<Item = f32>,
{
    if !capturing.load(Ordering::SeqCst) {
        return;
    }
    if let Ok(mut buf) = buffer.lock() {
        let remaining = capacity.saturating_sub(buf.len());
        buf.extend(samples.take(remaining));
    }
}

fn log_stream_error(e: cpal::StreamError) {
    warn!("Capture stream error: {}", e);
}
