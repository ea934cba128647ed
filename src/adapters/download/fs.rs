//! Download sink writing into a local output directory

use super::DownloadSink;
use crate::domain::context::ResultExt;
use crate::domain::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Saves files into a fixed output directory
#[derive(Debug, Clone)]
pub struct FsDownloadSink {
    output_dir: PathBuf,
}

impl FsDownloadSink {
    /// Creates a sink; the directory is created on first save
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory files are saved into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl DownloadSink for FsDownloadSink {
    async fn save(&self, name: &str, bytes: Vec<u8>) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to save {}", path.display()))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let sink = FsDownloadSink::new(dir.path().join("out"));

        sink.save("deck.zip", b"zip".to_vec()).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("out/deck.zip")).unwrap(), b"zip");
    }
}
