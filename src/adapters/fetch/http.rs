//! HTTP and local-file image fetcher

use super::traits::{FetchedImage, ImageFetcher};
use crate::config::FetchConfig;
use crate::domain::{CardexError, FetchError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Fetches remote images over HTTP(S) and local images from disk
///
/// Relative paths are resolved against the base directory, normally the
/// directory holding the card document.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
    base_dir: Option<PathBuf>,
}

impl HttpImageFetcher {
    /// Builds a fetcher from the fetch configuration
    ///
    /// # Errors
    ///
    /// Returns [`CardexError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CardexError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_dir: None,
        })
    }

    /// Resolves relative paths against `base_dir`
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    async fn fetch_remote(&self, url: Url) -> std::result::Result<FetchedImage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let header_mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_string())
            .filter(|value| value.starts_with("image/"));

        let bytes = response.bytes().await?.to_vec();
        let mime = header_mime.unwrap_or_else(|| guess_mime(Path::new(url.path())));

        tracing::debug!(url = %url, mime = %mime, bytes = bytes.len(), "Fetched remote image");
        Ok(FetchedImage::new(mime, bytes))
    }

    async fn fetch_local(&self, path: PathBuf) -> std::result::Result<FetchedImage, FetchError> {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read local image");
        Ok(FetchedImage::new(guess_mime(&path), bytes))
    }

    fn resolve_path(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, src: &str) -> std::result::Result<FetchedImage, FetchError> {
        match Url::parse(src) {
            Ok(url) => match url.scheme() {
                "http" | "https" => self.fetch_remote(url).await,
                "file" => {
                    let path = url
                        .to_file_path()
                        .map_err(|_| FetchError::UnsupportedSource(src.to_string()))?;
                    self.fetch_local(path).await
                }
                _ => Err(FetchError::UnsupportedSource(src.to_string())),
            },
            // Not an absolute URL: treat it as a filesystem path
            Err(_) => self.fetch_local(self.resolve_path(src)).await,
        }
    }
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
