//! Directory access trait definitions

use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A directory the user granted write access to
#[async_trait]
pub trait DirectoryHandle: Send + Sync {
    /// Display name of the directory
    fn name(&self) -> &str;

    /// Creates (or opens) a nested directory
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CardexError::Persistence`] on failure.
    async fn create_subdirectory(&self, name: &str) -> Result<Arc<dyn DirectoryHandle>>;

    /// Writes one file, replacing any existing file with the same name
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CardexError::Persistence`] on failure.
    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Asks for a directory to export into
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Requests a directory handle
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CardexError::UserCancelled`] when the user
    /// dismisses the request, or [`crate::domain::CardexError::Persistence`]
    /// when access cannot be obtained.
    async fn request_directory(&self) -> Result<Arc<dyn DirectoryHandle>>;
}
