//! Whole-file saves
//!
//! Used for the finished archive and for single-mode exports.

pub mod fs;

pub use fs::FsDownloadSink;

use crate::domain::Result;
use async_trait::async_trait;

/// Destination for a complete file
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Saves `bytes` under `name`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be saved.
    async fn save(&self, name: &str, bytes: Vec<u8>) -> Result<()>;
}
