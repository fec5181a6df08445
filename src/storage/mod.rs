mod local;

pub use local::LocalStorage;

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};

use crate::error::RecorderError;

/// File persistence seam used by the recording session and the load path.
///
/// Keeps blocking disk I/O off the thread driving the session; the local
/// implementation delegates to tokio's async filesystem.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    async fn delete(&self, path: &Path) -> Result<(), RecorderError>;

    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), RecorderError>;

    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, RecorderError>;
}

/// Default base name for a saved recording:
/// `"<base> YYYY_MM_DD HH_MM_SS_ffff"` with a four-digit
/// ten-thousandths-of-a-second field, in UTC. The session appends the
/// `.wav` extension when saving. A naming policy, not a contract; callers
/// may pass any name to the session.
pub fn default_file_name(base: &str, now: DateTime<Utc>) -> String {
    let ten_thousandths = now.nanosecond() / 100_000;
    format!(
        "{} {}_{:04}",
        base,
        now.format("%Y_%m_%d %H_%M_%S"),
        ten_thousandths
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_file_name_format() {
        let now = Utc
            .with_ymd_and_hms(2023, 8, 9, 11, 33, 33)
            .unwrap()
            .with_nanosecond(559_000_000)
            .unwrap();

        assert_eq!(
            default_file_name("Audio", now),
            "Audio 2023_08_09 11_33_33_5590"
        );
    }
}
