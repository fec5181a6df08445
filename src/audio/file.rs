use std::path::Path;

use tracing::info;

use super::buffer::SampleBuffer;
use super::codec;
use crate::error::RecorderError;
use crate::storage::Storage;

/// A recording loaded back from storage.
pub struct RecordedFile {
    pub path: String,
    pub duration_seconds: f64,
    pub buffer: SampleBuffer,
}

impl RecordedFile {
    /// Load and decode a WAV file.
    ///
    /// A missing path is reported as `FileNotFound` up front rather than
    /// surfacing as a read error; decode failures propagate unchanged.
    pub async fn load(storage: &dyn Storage, path: impl AsRef<Path>) -> Result<Self, RecorderError> {
        let path = path.as_ref();
        info!("Loading audio file: {}", path.display());

        if !storage.exists(path).await {
            return Err(RecorderError::FileNotFound(path.to_path_buf()));
        }

        let bytes = storage.read_bytes(path).await?;
        let buffer = codec::decode(&bytes)?;
        let duration_seconds = buffer.duration_seconds();

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            buffer.sample_rate,
            buffer.channels,
            buffer.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            buffer,
        })
    }
}
