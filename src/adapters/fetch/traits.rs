//! Image fetcher trait definition

use crate::domain::FetchError;
use async_trait::async_trait;

/// Bytes of one fetched image together with its MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    /// MIME type used in the generated `data:` URI
    pub mime: String,

    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl FetchedImage {
    /// Creates a fetched image
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }
}

/// Retrieves the bytes behind an image source
///
/// Failures are reported per image; the inliner keeps the original source of
/// any image whose fetch fails.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetches one image source (URL or path)
    async fn fetch(&self, src: &str) -> Result<FetchedImage, FetchError>;
}
