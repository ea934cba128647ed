//! In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cardex::adapters::directory::{DirectoryHandle, DirectoryProvider};
use cardex::adapters::download::DownloadSink;
use cardex::adapters::factory::Collaborators;
use cardex::adapters::fetch::{FetchedImage, ImageFetcher};
use cardex::adapters::renderer::{RenderOptions, Renderer};
use cardex::adapters::store::DocumentStore;
use cardex::core::export::ExportSettings;
use cardex::domain::{
    Card, CardDescriptor, CardexError, FetchError, NamingConfig, Node, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// `n` cards named `card-1` .. `card-n`, each with one remote image
pub fn cards(n: usize) -> Vec<Card> {
    (1..=n)
        .map(|i| {
            Card::new(format!("card-{i}"))
                .with_node(Node::image(format!("https://cdn.example.com/{i}.png")))
        })
        .collect()
}

/// Settings with short timings
pub fn fast_settings() -> ExportSettings {
    ExportSettings {
        concurrency_limit: 3,
        chunk_size: 3,
        pacing_delay: Duration::from_millis(20),
        success_display: Duration::from_millis(50),
    }
}

pub struct MemoryStore {
    cards: Vec<CardDescriptor>,
    naming: NamingConfig,
    fail: bool,
}

impl MemoryStore {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: CardDescriptor::from_cards(cards),
            naming: NamingConfig::default(),
            fail: false,
        }
    }

    pub fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub async fn card(&self, index: usize) -> Card {
        self.cards[index].handle.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_cards(&self) -> Result<Vec<CardDescriptor>> {
        if self.fail {
            return Err(CardexError::Store("store offline".to_string()));
        }
        Ok(self.cards.clone())
    }

    async fn naming_config(&self) -> Result<NamingConfig> {
        Ok(self.naming.clone())
    }
}

/// Renders `id@scale` and records every image source it saw
///
/// Also tracks how many renders are pending at once.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: AtomicUsize,
    pub seen_sources: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    fail_on: Option<String>,
    delay: Duration,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(card_id: &str) -> Self {
        Self {
            fail_on: Some(card_id.to_string()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of renders pending at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn render(&self, card: &Card, options: &RenderOptions) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.seen_sources
            .lock()
            .unwrap()
            .extend(card.image_sources().into_iter().map(|(_, src)| src));

        if self.fail_on.as_deref() == Some(card.id.as_str()) {
            return Err(CardexError::Render(format!("cannot render {}", card.id)));
        }
        Ok(format!("{}@{}", card.id, options.pixel_scale).into_bytes())
    }
}

/// Serves fixed bytes for known sources, fails for the rest
#[derive(Default)]
pub struct MapFetcher {
    images: HashMap<String, FetchedImage>,
    pub calls: AtomicUsize,
}

impl MapFetcher {
    /// Serves every `https://cdn.example.com/{i}.png` for `i` in `1..=n`
    pub fn serving(n: usize) -> Self {
        let images = (1..=n)
            .map(|i| {
                (
                    format!("https://cdn.example.com/{i}.png"),
                    FetchedImage::new("image/png", vec![i as u8; 4]),
                )
            })
            .collect();
        Self {
            images,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ImageFetcher for MapFetcher {
    async fn fetch(&self, src: &str) -> std::result::Result<FetchedImage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.images
            .get(src)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: src.to_string(),
                status: 404,
            })
    }
}

/// What the directory provider does when asked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Hands out a directory
    Allow,
    /// The user dismisses the request
    Cancel,
    /// Access is refused
    Deny,
}

#[derive(Default)]
struct DirectoryState {
    files: Mutex<Vec<(String, Vec<u8>)>>,
    subdirectories: Mutex<Vec<String>>,
    attempts: AtomicUsize,
}

/// Directory provider backed by memory; the `fail_on_write`-th write fails
pub struct MemoryDirectoryProvider {
    grant: Grant,
    fail_on_write: Option<usize>,
    state: Arc<DirectoryState>,
    pub requests: AtomicUsize,
}

impl MemoryDirectoryProvider {
    pub fn new(grant: Grant) -> Self {
        Self {
            grant,
            fail_on_write: None,
            state: Arc::new(DirectoryState::default()),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn failing_on_write(mut self, nth: usize) -> Self {
        self.fail_on_write = Some(nth);
        self
    }

    pub fn written(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn subdirectories(&self) -> Vec<String> {
        self.state.subdirectories.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryProvider for MemoryDirectoryProvider {
    async fn request_directory(&self) -> Result<Arc<dyn DirectoryHandle>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.grant {
            Grant::Allow => Ok(Arc::new(MemoryDirectory {
                name: "granted".to_string(),
                fail_on_write: self.fail_on_write,
                state: self.state.clone(),
            })),
            Grant::Cancel => Err(CardexError::UserCancelled),
            Grant::Deny => Err(CardexError::Persistence("permission denied".to_string())),
        }
    }
}

struct MemoryDirectory {
    name: String,
    fail_on_write: Option<usize>,
    state: Arc<DirectoryState>,
}

#[async_trait]
impl DirectoryHandle for MemoryDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_subdirectory(&self, name: &str) -> Result<Arc<dyn DirectoryHandle>> {
        self.state
            .subdirectories
            .lock()
            .unwrap()
            .push(name.to_string());
        Ok(Arc::new(MemoryDirectory {
            name: name.to_string(),
            fail_on_write: self.fail_on_write,
            state: self.state.clone(),
        }))
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let attempt = self.state.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_write == Some(attempt) {
            return Err(CardexError::Persistence(format!("disk full writing {name}")));
        }
        self.state
            .files
            .lock()
            .unwrap()
            .push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Records every saved file with the moment it was saved
#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Vec<u8>, Instant)>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _, _)| name.clone())
            .collect()
    }

    pub fn bytes(&self, index: usize) -> Vec<u8> {
        self.saved.lock().unwrap()[index].1.clone()
    }

    pub fn instants(&self) -> Vec<Instant> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, at)| *at)
            .collect()
    }
}

#[async_trait]
impl DownloadSink for MemorySink {
    async fn save(&self, name: &str, bytes: Vec<u8>) -> Result<()> {
        if self.fail {
            return Err(CardexError::Io("download blocked".to_string()));
        }
        self.saved
            .lock()
            .unwrap()
            .push((name.to_string(), bytes, Instant::now()));
        Ok(())
    }
}

/// A full set of in-memory collaborators, keeping typed handles for assertions
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub renderer: Arc<RecordingRenderer>,
    pub fetcher: Arc<MapFetcher>,
    pub directories: Arc<MemoryDirectoryProvider>,
    pub sink: Arc<MemorySink>,
}

impl Harness {
    pub fn new(card_count: usize) -> Self {
        Self {
            store: Arc::new(MemoryStore::new(cards(card_count))),
            renderer: Arc::new(RecordingRenderer::new()),
            fetcher: Arc::new(MapFetcher::serving(card_count)),
            directories: Arc::new(MemoryDirectoryProvider::new(Grant::Allow)),
            sink: Arc::new(MemorySink::new()),
        }
    }

    pub fn with_store(mut self, store: MemoryStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn with_renderer(mut self, renderer: RecordingRenderer) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn with_directories(mut self, directories: MemoryDirectoryProvider) -> Self {
        self.directories = Arc::new(directories);
        self
    }

    pub fn with_sink(mut self, sink: MemorySink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            store: self.store.clone(),
            renderer: self.renderer.clone(),
            fetcher: self.fetcher.clone(),
            directories: self.directories.clone(),
            downloads: self.sink.clone(),
        }
    }
}
