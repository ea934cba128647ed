//! Local filesystem directory access

use super::traits::{DirectoryHandle, DirectoryProvider};
use crate::core::naming::sanitize_segment;
use crate::domain::{CardexError, Result};
use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle to a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FsDirectoryHandle {
    path: PathBuf,
    name: String,
}

impl FsDirectoryHandle {
    /// Wraps an existing directory
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    /// Filesystem path of the directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DirectoryHandle for FsDirectoryHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_subdirectory(&self, name: &str) -> Result<Arc<dyn DirectoryHandle>> {
        let path = self.path.join(sanitize_segment(name));
        tokio::fs::create_dir_all(&path).await.map_err(|e| {
            CardexError::Persistence(format!(
                "Failed to create directory {}: {e}",
                path.display()
            ))
        })?;

        tracing::debug!(path = %path.display(), "Created export subdirectory");
        Ok(Arc::new(FsDirectoryHandle::new(path)))
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path.join(name);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            CardexError::Persistence(format!("Failed to write {}: {e}", path.display()))
        })?;

        tracing::trace!(path = %path.display(), bytes = bytes.len(), "Wrote file");
        Ok(())
    }
}

async fn open_directory(path: &Path) -> Result<Arc<dyn DirectoryHandle>> {
    tokio::fs::create_dir_all(path).await.map_err(|e| {
        CardexError::Persistence(format!(
            "Cannot access directory {}: {e}",
            path.display()
        ))
    })?;
    Ok(Arc::new(FsDirectoryHandle::new(path)))
}

/// Grants a fixed directory without asking
#[derive(Debug, Clone)]
pub struct FsDirectoryProvider {
    path: PathBuf,
}

impl FsDirectoryProvider {
    /// Creates a provider for `path`; the directory is created on request
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DirectoryProvider for FsDirectoryProvider {
    async fn request_directory(&self) -> Result<Arc<dyn DirectoryHandle>> {
        open_directory(&self.path).await
    }
}

/// Asks for a directory on the terminal
///
/// An empty answer accepts the default directory when one is configured.
/// `q`, an empty answer without a default, or end of input cancel.
#[derive(Debug, Clone, Default)]
pub struct PromptDirectoryProvider {
    default: Option<PathBuf>,
}

impl PromptDirectoryProvider {
    /// Creates a prompt with an optional default answer
    pub fn new(default: Option<PathBuf>) -> Self {
        Self { default }
    }
}

#[async_trait]
impl DirectoryProvider for PromptDirectoryProvider {
    async fn request_directory(&self) -> Result<Arc<dyn DirectoryHandle>> {
        let default = self.default.clone();
        let prompt_default = default.clone();

        let answer = tokio::task::spawn_blocking(move || read_answer(prompt_default.as_deref()))
            .await
            .map_err(|e| CardexError::Persistence(format!("Directory prompt failed: {e}")))??;

        match interpret_answer(answer.as_deref(), default.as_deref()) {
            Some(path) => open_directory(&path).await,
            None => {
                tracing::debug!("Directory prompt dismissed");
                Err(CardexError::UserCancelled)
            }
        }
    }
}

fn read_answer(default: Option<&Path>) -> Result<Option<String>> {
    let mut stderr = std::io::stderr();
    match default {
        Some(path) => write!(
            stderr,
            "Export directory [{}] (q to cancel): ",
            path.display()
        )?,
        None => write!(stderr, "Export directory (empty or q to cancel): ")?,
    }
    stderr.flush()?;

    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Maps a prompt answer to a directory, `None` meaning cancelled
pub fn interpret_answer(answer: Option<&str>, default: Option<&Path>) -> Option<PathBuf> {
    let answer = answer?.trim();
    if answer.eq_ignore_ascii_case("q") {
        return None;
    }
    if answer.is_empty() {
        return default.map(Path::to_path_buf);
    }
    Some(PathBuf::from(answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_file_and_subdirectory() {
        let dir = TempDir::new().unwrap();
        let handle = FsDirectoryProvider::new(dir.path())
            .request_directory()
            .await
            .unwrap();

        let nested = handle.create_subdirectory("deck").await.unwrap();
        nested.write_file("a.png", b"bytes").await.unwrap();

        assert_eq!(nested.name(), "deck");
        assert_eq!(std::fs::read(dir.path().join("deck/a.png")).unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_subdirectory_name_is_sanitized() {
        let dir = TempDir::new().unwrap();
        let handle = FsDirectoryHandle::new(dir.path());

        let nested = handle.create_subdirectory("a/b").await.unwrap();
        assert_eq!(nested.name(), "a-b");
        assert!(dir.path().join("a-b").is_dir());
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let handle = FsDirectoryHandle::new(dir.path().join("gone"));

        let result = handle.write_file("a.png", b"x").await;
        assert!(matches!(result, Err(CardexError::Persistence(_))));
    }

    #[test]
    fn test_interpret_answer() {
        let default = PathBuf::from("/tmp/out");

        assert_eq!(interpret_answer(None, Some(&default)), None);
        assert_eq!(interpret_answer(Some("q\n"), Some(&default)), None);
        assert_eq!(interpret_answer(Some("\n"), None), None);
        assert_eq!(interpret_answer(Some("\n"), Some(&default)), Some(default.clone()));
        assert_eq!(
            interpret_answer(Some(" /data/cards \n"), Some(&default)),
            Some(PathBuf::from("/data/cards"))
        );
    }
}
