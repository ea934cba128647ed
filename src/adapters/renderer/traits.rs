//! Renderer trait definition
//!
//! The renderer rasterizes a card into encoded image bytes. It is consumed by
//! the image inliner, the scheduler tasks and the size estimator.

use crate::domain::{export_ignore_predicate, Card, ExcludePredicate, ImageFormat, Result};
use async_trait::async_trait;
use std::fmt;

/// Options for one render call
#[derive(Clone)]
pub struct RenderOptions {
    /// Output encoding
    pub format: ImageFormat,

    /// Device pixel ratio applied to the card's logical size
    pub pixel_scale: u32,

    /// Nodes matching this predicate are left out of the output
    pub exclude: ExcludePredicate,
}

impl RenderOptions {
    /// Options that exclude `export-ignore` nodes
    pub fn new(format: ImageFormat, pixel_scale: u32) -> Self {
        Self {
            format,
            pixel_scale,
            exclude: export_ignore_predicate(),
        }
    }

    /// Replaces the exclusion predicate
    pub fn with_exclude(mut self, exclude: ExcludePredicate) -> Self {
        self.exclude = exclude;
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("format", &self.format)
            .field("pixel_scale", &self.pixel_scale)
            .finish_non_exhaustive()
    }
}

/// Card rasterizer
///
/// Implementations must honor [`RenderOptions::exclude`] and must not mutate
/// the card.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders a card into encoded image bytes
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CardexError::Render`] if the card cannot be
    /// rasterized or encoded.
    async fn render(&self, card: &Card, options: &RenderOptions) -> Result<Vec<u8>>;
}
