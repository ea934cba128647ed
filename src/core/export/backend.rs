//! Persistence backends
//!
//! A backend consumes the [`RenderedFile`]s produced by the scheduler:
//! - [`ArchiveBackend`] collects them into one in-memory zip, saved once
//! - [`FolderBackend`] writes each one straight into a granted directory

use crate::adapters::directory::{DirectoryHandle, DirectoryProvider};
use crate::adapters::download::DownloadSink;
use crate::domain::context::ResultExt;
use crate::domain::{BackendKind, CardexError, RenderedFile, Result};
use async_trait::async_trait;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Destination for rendered files
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Which strategy this backend implements
    fn kind(&self) -> BackendKind;

    /// Stores one rendered file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stored.
    async fn persist(&self, file: RenderedFile) -> Result<()>;

    /// Completes the export after every file was persisted
    ///
    /// Returns the number of files stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be finalized.
    async fn finish(&self) -> Result<usize>;
}

/// Collects files into a zip archive and saves it once
///
/// Entries are stored uncompressed: PNG and JPEG payloads are already
/// compressed.
pub struct ArchiveBackend {
    writer: Mutex<Option<ZipWriter<Cursor<Vec<u8>>>>>,
    entries: AtomicUsize,
    archive_name: String,
    sink: Arc<dyn DownloadSink>,
}

impl ArchiveBackend {
    /// Creates an empty archive saved as `archive_name` on finish
    pub fn new(archive_name: impl Into<String>, sink: Arc<dyn DownloadSink>) -> Self {
        Self {
            writer: Mutex::new(Some(ZipWriter::new(Cursor::new(Vec::new())))),
            entries: AtomicUsize::new(0),
            archive_name: archive_name.into(),
            sink,
        }
    }

    /// File name the archive is saved under
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    fn lock_writer(&self) -> Result<std::sync::MutexGuard<'_, Option<ZipWriter<Cursor<Vec<u8>>>>>> {
        self.writer
            .lock()
            .map_err(|_| CardexError::ArchiveSave("Archive writer lock poisoned".to_string()))
    }
}

#[async_trait]
impl PersistenceBackend for ArchiveBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Archive
    }

    async fn persist(&self, file: RenderedFile) -> Result<()> {
        let mut guard = self.lock_writer()?;
        let writer = guard
            .as_mut()
            .ok_or_else(|| CardexError::ArchiveSave("Archive already finished".to_string()))?;

        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer
            .start_file(file.name.as_str(), options)
            .with_context(|| format!("Failed to add {}", file.name))?;
        writer
            .write_all(&file.bytes)
            .map_err(|e| CardexError::ArchiveSave(format!("Failed to write {}: {e}", file.name)))?;

        self.entries.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(name = %file.name, bytes = file.bytes.len(), "Added archive entry");
        Ok(())
    }

    async fn finish(&self) -> Result<usize> {
        let writer = self
            .lock_writer()?
            .take()
            .ok_or_else(|| CardexError::ArchiveSave("Archive already finished".to_string()))?;

        let bytes = writer.finish()?.into_inner();
        let entries = self.entries.load(Ordering::SeqCst);

        tracing::info!(
            archive = %self.archive_name,
            entries,
            bytes = bytes.len(),
            "Saving archive"
        );

        self.sink
            .save(&self.archive_name, bytes)
            .await
            .map_err(|e| CardexError::ArchiveSave(format!("{}: {e}", self.archive_name)))?;

        Ok(entries)
    }
}

/// Writes every file into a granted directory
pub struct FolderBackend {
    dir: Arc<dyn DirectoryHandle>,
    written: AtomicUsize,
}

impl FolderBackend {
    /// Wraps an already granted directory
    pub fn new(dir: Arc<dyn DirectoryHandle>) -> Self {
        Self {
            dir,
            written: AtomicUsize::new(0),
        }
    }

    /// Asks for a directory and opens the nested `folder_name` inside it
    ///
    /// A blank `folder_name` writes into the granted directory itself.
    ///
    /// # Errors
    ///
    /// Returns [`CardexError::UserCancelled`] when the request is dismissed,
    /// or the provider's error when access fails.
    pub async fn open(provider: &dyn DirectoryProvider, folder_name: &str) -> Result<Self> {
        let granted = provider.request_directory().await?;

        let dir = if folder_name.trim().is_empty() {
            granted
        } else {
            granted.create_subdirectory(folder_name.trim()).await?
        };

        tracing::info!(directory = %dir.name(), "Writing files directly to folder");
        Ok(Self::new(dir))
    }

    /// Directory files are written into
    pub fn directory(&self) -> &Arc<dyn DirectoryHandle> {
        &self.dir
    }
}

#[async_trait]
impl PersistenceBackend for FolderBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DirectFolder
    }

    async fn persist(&self, file: RenderedFile) -> Result<()> {
        self.dir.write_file(&file.name, &file.bytes).await?;
        self.written.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn finish(&self) -> Result<usize> {
        Ok(self.written.load(Ordering::SeqCst))
    }
}
