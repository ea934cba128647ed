//! Scoped image inlining
//!
//! Renderers only see self-contained cards: every image that still points at
//! a URL or a path is swapped for a `data:` URI for the duration of one render
//! call. [`InlineGuard`] owns the swap and puts the original sources back when
//! it is dropped, so the card is restored after success, after a render error
//! and when the render future itself is dropped.

use crate::adapters::fetch::{FetchedImage, ImageFetcher};
use crate::adapters::renderer::{RenderOptions, Renderer};
use crate::domain::{Card, CardHandle, NodePath, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::join_all;
use std::collections::HashMap;
use std::ops::Deref;

/// Encodes fetched bytes as a `data:` URI
pub fn to_data_uri(image: &FetchedImage) -> String {
    format!("data:{};base64,{}", image.mime, STANDARD.encode(&image.bytes))
}

/// Temporary source swap on a card, undone on drop
pub struct InlineGuard<'a> {
    card: &'a mut Card,
    originals: Vec<(NodePath, String)>,
}

impl<'a> InlineGuard<'a> {
    fn new(card: &'a mut Card) -> Self {
        Self {
            card,
            originals: Vec::new(),
        }
    }

    fn swap(&mut self, path: NodePath, src: String) {
        if let Some(original) = self.card.set_image_src(&path, src) {
            self.originals.push((path, original));
        }
    }

    /// Number of image sources currently swapped
    pub fn swapped(&self) -> usize {
        self.originals.len()
    }
}

impl Deref for InlineGuard<'_> {
    type Target = Card;

    fn deref(&self) -> &Card {
        self.card
    }
}

impl Drop for InlineGuard<'_> {
    fn drop(&mut self) {
        for (path, original) in self.originals.drain(..).rev() {
            self.card.set_image_src(&path, original);
        }
    }
}

/// Fetches every external image of `card` and swaps it for a `data:` URI
///
/// Each distinct source is fetched once; all fetches run concurrently. A
/// failed fetch is logged and leaves that image untouched.
pub async fn inline_images<'a>(card: &'a mut Card, fetcher: &dyn ImageFetcher) -> InlineGuard<'a> {
    let external = card.external_image_sources();
    let mut guard = InlineGuard::new(card);
    if external.is_empty() {
        return guard;
    }

    let mut unique: Vec<&str> = external.iter().map(|(_, src)| src.as_str()).collect();
    unique.sort_unstable();
    unique.dedup();

    let fetched = join_all(unique.iter().map(|src| async move {
        let result = fetcher.fetch(src).await;
        (src.to_string(), result)
    }))
    .await;

    let mut embedded: HashMap<String, String> = HashMap::new();
    for (src, result) in fetched {
        match result {
            Ok(image) => {
                embedded.insert(src, to_data_uri(&image));
            }
            Err(e) => {
                tracing::warn!(
                    card_id = %guard.id,
                    src = %src,
                    error = %e,
                    "Failed to inline image, keeping original source"
                );
            }
        }
    }

    for (path, src) in external {
        if let Some(data_uri) = embedded.get(&src) {
            guard.swap(path, data_uri.clone());
        }
    }

    tracing::debug!(
        card_id = %guard.id,
        inlined = guard.swapped(),
        "Inlined card images"
    );
    guard
}

/// Renders `card` with its external images embedded, then restores it
///
/// The renderer is called exactly once, after every swap is in place.
///
/// # Errors
///
/// Returns the renderer's error; the card is restored either way.
pub async fn with_inlined_images(
    card: &mut Card,
    fetcher: &dyn ImageFetcher,
    renderer: &dyn Renderer,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let guard = inline_images(card, fetcher).await;
    renderer.render(&guard, options).await
}

/// Locks a shared card for the whole inline, render and restore scope
///
/// # Errors
///
/// Returns the renderer's error.
pub async fn render_card(
    handle: &CardHandle,
    fetcher: &dyn ImageFetcher,
    renderer: &dyn Renderer,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let mut card = handle.lock().await;
    with_inlined_images(&mut card, fetcher, renderer, options).await
}
