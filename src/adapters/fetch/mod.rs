//! Image retrieval for inlining
//!
//! - [`ImageFetcher`] - per-source fetch interface
//! - [`HttpImageFetcher`] - `reqwest` for remote URLs, `tokio::fs` for local files

pub mod http;
pub mod traits;

pub use http::HttpImageFetcher;
pub use traits::{FetchedImage, ImageFetcher};
