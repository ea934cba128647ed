//! Document store trait definition

use crate::domain::{CardDescriptor, NamingConfig, Result};
use async_trait::async_trait;

/// Source of the cards to export and of their naming configuration
///
/// Descriptors returned by [`DocumentStore::list_cards`] share handles across
/// calls, so a render in progress locks the same card the estimator would.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ordered list of cards in the current document
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CardexError::Store`] if the document cannot be read.
    async fn list_cards(&self) -> Result<Vec<CardDescriptor>>;

    /// Naming configuration attached to the document
    async fn naming_config(&self) -> Result<NamingConfig>;
}
