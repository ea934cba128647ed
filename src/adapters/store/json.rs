//! JSON-backed document store
//!
//! Loads a document of the form:
//!
//! ```json
//! {
//!   "naming": { "mode": "system", "custom": "launch" },
//!   "cards": [ { "id": "c1", "nodes": [ { "type": "image", "src": "a.png" } ] } ]
//! }
//! ```

use super::traits::DocumentStore;
use crate::domain::{Card, CardDescriptor, CardexError, NamingConfig, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// On-disk document layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardDocument {
    /// Naming configuration for exported files
    #[serde(default)]
    pub naming: NamingConfig,

    /// Cards in export order
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Document store holding every card in memory
#[derive(Debug)]
pub struct JsonDocumentStore {
    naming: NamingConfig,
    descriptors: Vec<CardDescriptor>,
    base_dir: Option<PathBuf>,
}

impl JsonDocumentStore {
    /// Loads and validates a document from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// contains duplicate card ids.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CardexError::Store(format!("Failed to read document {}: {e}", path.display()))
        })?;
        let document: CardDocument = serde_json::from_str(&content).map_err(|e| {
            CardexError::Store(format!("Failed to parse document {}: {e}", path.display()))
        })?;

        let mut store = Self::from_document(document)?;
        store.base_dir = path.parent().map(Path::to_path_buf);

        tracing::info!(
            path = %path.display(),
            cards = store.descriptors.len(),
            "Loaded card document"
        );
        Ok(store)
    }

    /// Builds a store from an in-memory document
    ///
    /// # Errors
    ///
    /// Returns [`CardexError::Store`] if two cards share an id.
    pub fn from_document(document: CardDocument) -> Result<Self> {
        let mut seen = HashSet::new();
        for card in &document.cards {
            if !seen.insert(card.id.as_str()) {
                return Err(CardexError::Store(format!(
                    "Duplicate card id '{}'",
                    card.id
                )));
            }
        }

        Ok(Self {
            naming: document.naming,
            descriptors: CardDescriptor::from_cards(document.cards),
            base_dir: None,
        })
    }

    /// Directory containing the document, used to resolve relative image paths
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    async fn list_cards(&self) -> Result<Vec<CardDescriptor>> {
        Ok(self.descriptors.clone())
    }

    async fn naming_config(&self) -> Result<NamingConfig> {
        Ok(self.naming.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = r##"{
        "naming": { "mode": "custom", "parts": [ { "kind": "prefix", "text": "deck" } ] },
        "cards": [
            { "id": "a", "nodes": [ { "type": "image", "src": "img/a.png" } ] },
            { "id": "b", "background": "#000000" }
        ]
    }"##;

    #[tokio::test]
    async fn test_load_document() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();

        let store = JsonDocumentStore::load(file.path()).await.unwrap();
        let cards = store.list_cards().await.unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].handle.lock().await.background, "#000000");
        assert!(matches!(
            store.naming_config().await.unwrap(),
            NamingConfig::Custom { .. }
        ));
        assert_eq!(store.base_dir(), file.path().parent());
    }

    #[tokio::test]
    async fn test_handles_are_shared_between_calls() {
        let document: CardDocument = serde_json::from_str(DOCUMENT).unwrap();
        let store = JsonDocumentStore::from_document(document).unwrap();

        let first = store.list_cards().await.unwrap();
        let second = store.list_cards().await.unwrap();
        assert!(Arc::ptr_eq(&first[0].handle, &second[0].handle));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let document = CardDocument {
            naming: NamingConfig::default(),
            cards: vec![Card::new("x"), Card::new("x")],
        };
        let err = JsonDocumentStore::from_document(document).unwrap_err();
        assert!(err.to_string().contains("Duplicate card id 'x'"));
    }

    #[tokio::test]
    async fn test_missing_file_is_store_error() {
        let result = JsonDocumentStore::load("/nonexistent/cards.json").await;
        assert!(matches!(result, Err(CardexError::Store(_))));
    }

    #[test]
    fn test_missing_naming_defaults_to_system() {
        let document: CardDocument = serde_json::from_str(r#"{"cards": []}"#).unwrap();
        assert!(matches!(document.naming, NamingConfig::System { .. }));
    }
}
