//! Export size estimation
//!
//! A probe render of the first card (without image inlining) projects the
//! single-file size and the total size of an export. Requests are debounced
//! and superseding: every trigger bumps a generation counter, and a probe only
//! publishes while its generation is still the latest.

use crate::adapters::renderer::{RenderOptions, Renderer};
use crate::adapters::store::DocumentStore;
use crate::domain::{ImageFormat, Result};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default quiet period before a probe render starts
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One displayed size value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeReading {
    /// Nothing measured yet
    #[default]
    Unknown,
    /// A probe render is in flight
    Calculating,
    /// Measured or projected size in bytes
    Bytes(u64),
    /// The last probe failed
    Error,
}

impl fmt::Display for SizeReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeReading::Unknown => f.write_str("-"),
            SizeReading::Calculating => f.write_str("Calculating..."),
            SizeReading::Bytes(bytes) => write!(f, "{:.2} MB", *bytes as f64 / BYTES_PER_MB),
            SizeReading::Error => f.write_str("Error"),
        }
    }
}

/// Single-file and total projected sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePreview {
    /// Size of one exported card
    pub single: SizeReading,
    /// Single size multiplied by the number of cards
    pub total: SizeReading,
}

impl SizePreview {
    fn both(reading: SizeReading) -> Self {
        Self {
            single: reading,
            total: reading,
        }
    }
}

/// Result of a one-shot estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    /// Encoded size of the first card
    pub single_bytes: u64,
    /// `single_bytes × cards`
    pub total_bytes: u64,
    /// Number of cards in the document
    pub cards: usize,
}

impl SizeEstimate {
    /// Display form of the estimate
    pub fn preview(&self) -> SizePreview {
        SizePreview {
            single: SizeReading::Bytes(self.single_bytes),
            total: SizeReading::Bytes(self.total_bytes),
        }
    }
}

/// Renders the first card once and projects the export size
///
/// Returns `None` when the document has no cards.
///
/// # Errors
///
/// Returns the store or renderer error.
pub async fn preview_size(
    store: &dyn DocumentStore,
    renderer: &dyn Renderer,
    format: ImageFormat,
    scale: u32,
) -> Result<Option<SizeEstimate>> {
    let cards = store.list_cards().await?;
    let Some(first) = cards.first() else {
        return Ok(None);
    };

    let options = RenderOptions::new(format, scale);
    let bytes = {
        let card = first.handle.lock().await;
        renderer.render(&card, &options).await?
    };

    let single_bytes = bytes.len() as u64;
    Ok(Some(SizeEstimate {
        single_bytes,
        total_bytes: single_bytes.saturating_mul(cards.len() as u64),
        cards: cards.len(),
    }))
}

/// Debounced, superseding size estimator
#[derive(Clone)]
pub struct SizeEstimator {
    store: Arc<dyn DocumentStore>,
    renderer: Arc<dyn Renderer>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    tx: Arc<watch::Sender<SizePreview>>,
}

impl SizeEstimator {
    /// Creates an estimator with the default debounce
    pub fn new(store: Arc<dyn DocumentStore>, renderer: Arc<dyn Renderer>) -> Self {
        let (tx, _rx) = watch::channel(SizePreview::default());
        Self {
            store,
            renderer,
            debounce: DEFAULT_DEBOUNCE,
            generation: Arc::new(AtomicU64::new(0)),
            tx: Arc::new(tx),
        }
    }

    /// Overrides the debounce period
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Receiver of published readings
    pub fn subscribe(&self) -> watch::Receiver<SizePreview> {
        self.tx.subscribe()
    }

    /// Latest published readings
    pub fn current(&self) -> SizePreview {
        *self.tx.borrow()
    }

    /// Requests a new estimate for `format` and `scale`
    ///
    /// Any request still waiting out its debounce, or still rendering, is
    /// superseded and will not publish.
    pub fn trigger(&self, format: ImageFormat, scale: u32) -> JoinHandle<()> {
        // Bumped under the channel lock so it orders against `publish`
        let mut generation = 0;
        self.tx.send_if_modified(|_| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            false
        });
        let estimator = self.clone();
        tokio::spawn(async move { estimator.run(generation, format, scale).await })
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(&self, generation: u64, format: ImageFormat, scale: u32) {
        tokio::time::sleep(self.debounce).await;
        if !self.is_latest(generation) {
            tracing::trace!(generation, "Size estimate superseded during debounce");
            return;
        }

        let cards = match self.store.list_cards().await {
            Ok(cards) => cards,
            Err(e) => {
                tracing::warn!(error = %e, "Size estimate failed to list cards");
                self.publish(generation, SizePreview::both(SizeReading::Error));
                return;
            }
        };
        if cards.is_empty() {
            return;
        }

        self.publish(generation, SizePreview::both(SizeReading::Calculating));

        let result = preview_size(self.store.as_ref(), self.renderer.as_ref(), format, scale).await;

        match result {
            Ok(Some(estimate)) => {
                tracing::debug!(
                    generation,
                    single_bytes = estimate.single_bytes,
                    total_bytes = estimate.total_bytes,
                    "Size estimate ready"
                );
                self.publish(generation, estimate.preview());
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Size estimate render failed");
                self.publish(generation, SizePreview::both(SizeReading::Error));
            }
        }
    }

    fn publish(&self, generation: u64, preview: SizePreview) -> bool {
        let published = self.tx.send_if_modified(|current| {
            if !self.is_latest(generation) {
                return false;
            }
            *current = preview;
            true
        });
        if !published {
            tracing::trace!(generation, "Dropping stale size estimate");
        }
        published
    }
}
