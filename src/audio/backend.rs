use async_trait::async_trait;

use crate::error::RecorderError;

/// Identifier of a capture device, as reported by the audio host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(pub String);

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for a capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Sample rate to capture at
    pub sample_rate: u32,
    /// Channel count to capture (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
        }
    }
}

/// Microphone capture backend trait
///
/// One capture at a time per backend instance. The capture buffer is
/// pre-allocated for the maximum duration at `start_capture`, and
/// `stop_capture` always returns that full-capacity buffer with the
/// unrecorded tail zero-filled. Trimming against elapsed time happens
/// downstream.
#[async_trait]
pub trait MicrophoneBackend: Send + Sync {
    /// Check whether any capture device is present.
    fn is_available(&self) -> bool;

    /// List capture devices known to the host.
    fn devices(&self) -> Vec<DeviceId>;

    /// Begin capturing from `device` into a buffer sized for
    /// `max_duration_secs`. Capture has genuinely started once this
    /// returns Ok.
    async fn start_capture(
        &mut self,
        device: &DeviceId,
        max_duration_secs: u32,
    ) -> Result<(), RecorderError>;

    /// Stop capturing and hand back the full pre-sized sample buffer.
    async fn stop_capture(&mut self) -> Result<Vec<f32>, RecorderError>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Capture backend factory
pub struct MicrophoneFactory;

impl MicrophoneFactory {
    /// Create the platform capture backend.
    pub fn create(config: CaptureConfig) -> Result<Box<dyn MicrophoneBackend>, RecorderError> {
        use super::cpal::CpalMicrophone;
        Ok(Box::new(CpalMicrophone::new(config)))
    }
}
