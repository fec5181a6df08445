use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::Storage;
use crate::error::RecorderError;

/// Local-filesystem storage backed by tokio::fs.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn delete(&self, path: &Path) -> Result<(), RecorderError> {
        debug!("Deleting file: {}", path.display());
        fs::remove_file(path).await?;
        Ok(())
    }

    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), RecorderError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        debug!("Writing {} bytes to {}", bytes.len(), path.display());
        fs::write(path, bytes).await?;
        Ok(())
    }

    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, RecorderError> {
        Ok(fs::read(path).await?)
    }
}
