// Shared test doubles for integration tests.

use std::path::Path;

use async_trait::async_trait;
use voicepad::{CaptureConfig, DeviceId, MicrophoneBackend, RecorderError, Storage};

/// Scripted capture backend: "records" a constant amplitude into the
/// pre-sized buffer, so trimming results are exactly predictable.
pub struct MockMicrophone {
    available: bool,
    config: CaptureConfig,
    fill_value: f32,
    capacity: usize,
    capturing: bool,
}

impl MockMicrophone {
    pub fn new() -> Self {
        Self {
            available: true,
            config: CaptureConfig::default(),
            fill_value: 0.25,
            capacity: 0,
            capturing: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }
}

#[async_trait]
impl MicrophoneBackend for MockMicrophone {
    fn is_available(&self) -> bool {
        self.available
    }

    fn devices(&self) -> Vec<DeviceId> {
        if self.available {
            vec![DeviceId("mock-input".to_string())]
        } else {
            Vec::new()
        }
    }

    async fn start_capture(
        &mut self,
        _device: &DeviceId,
        max_duration_secs: u32,
    ) -> Result<(), RecorderError> {
        if self.capturing {
            return Err(RecorderError::AlreadyRecording);
        }

        self.capacity = max_duration_secs as usize
            * self.config.sample_rate as usize
            * self.config.channels as usize;
        self.capturing = true;
        Ok(())
    }

    async fn stop_capture(&mut self) -> Result<Vec<f32>, RecorderError> {
        if !self.capturing {
            return Err(RecorderError::NotRecording);
        }

        self.capturing = false;
        Ok(vec![self.fill_value; self.capacity])
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Storage whose writes always fail, for exercising the failure path.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn exists(&self, _path: &Path) -> bool {
        false
    }

    async fn delete(&self, _path: &Path) -> Result<(), RecorderError> {
        Ok(())
    }

    async fn write_bytes(&self, _path: &Path, _bytes: &[u8]) -> Result<(), RecorderError> {
        Err(RecorderError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "simulated write failure",
        )))
    }

    async fn read_bytes(&self, _path: &Path) -> Result<Vec<u8>, RecorderError> {
        Err(RecorderError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "simulated read failure",
        )))
    }
}
