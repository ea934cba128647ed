//! Collaborator factory
//!
//! This module builds the production adapters from configuration.

use crate::adapters::directory::{DirectoryProvider, FsDirectoryProvider, PromptDirectoryProvider};
use crate::adapters::download::{DownloadSink, FsDownloadSink};
use crate::adapters::fetch::{HttpImageFetcher, ImageFetcher};
use crate::adapters::renderer::{RasterRenderer, Renderer};
use crate::adapters::store::{DocumentStore, JsonDocumentStore};
use crate::config::CardexConfig;
use crate::domain::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Every external collaborator the export pipeline talks to
#[derive(Clone)]
pub struct Collaborators {
    /// Card source
    pub store: Arc<dyn DocumentStore>,

    /// Card rasterizer
    pub renderer: Arc<dyn Renderer>,

    /// Image source resolver used while inlining
    pub fetcher: Arc<dyn ImageFetcher>,

    /// Grants the directory for folder exports
    pub directories: Arc<dyn DirectoryProvider>,

    /// Saves archives and single-mode files
    pub downloads: Arc<dyn DownloadSink>,
}

/// Create the production collaborators based on the configuration
///
/// The document is loaded eagerly so that a missing or malformed file is
/// reported before any export starts. Relative image paths resolve against
/// the document's directory.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or the HTTP client
/// cannot be built.
pub async fn create_collaborators(config: &CardexConfig) -> Result<Collaborators> {
    let store = JsonDocumentStore::load(&config.document.path).await?;

    let mut fetcher = HttpImageFetcher::new(&config.fetch)?;
    if let Some(base_dir) = store.base_dir() {
        fetcher = fetcher.with_base_dir(base_dir);
    }

    let output_dir = PathBuf::from(&config.export.output_dir);
    let directories: Arc<dyn DirectoryProvider> =
        if config.export.prompt_for_directory {
            tracing::debug!("Folder exports will prompt for a directory");
            Arc::new(PromptDirectoryProvider::new(Some(output_dir.clone())))
        } else {
            Arc::new(FsDirectoryProvider::new(output_dir.clone()))
        };

    Ok(Collaborators {
        store: Arc::new(store),
        renderer: Arc::new(RasterRenderer::new()),
        fetcher: Arc::new(fetcher),
        directories,
        downloads: Arc::new(FsDownloadSink::new(output_dir)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_collaborators_loads_document() {
        let dir = TempDir::new().unwrap();
        let document = dir.path().join("cards.json");
        std::fs::write(&document, r#"{"cards": [{"id": "a"}, {"id": "b"}]}"#).unwrap();

        let mut config = load_config_from_str("").unwrap();
        config.document.path = document.to_string_lossy().into_owned();
        config.export.output_dir = dir.path().join("out").to_string_lossy().into_owned();

        let collaborators = create_collaborators(&config).await.unwrap();
        assert_eq!(collaborators.store.list_cards().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_document_fails_early() {
        let mut config = load_config_from_str("").unwrap();
        config.document.path = "/nonexistent/cards.json".to_string();

        assert!(create_collaborators(&config).await.is_err());
    }
}
