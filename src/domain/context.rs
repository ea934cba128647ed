//! Error context extension trait
//!
//! Works like `anyhow::Context` for `Result<T, CardexError>`, except that the
//! error variant is kept: the export pipeline decides between retrying on the
//! archive backend and failing from the variant, so context only prefixes the
//! message.
//!
//! # Examples
//!
//! ```rust
//! use cardex::domain::Result;
//! use cardex::domain::context::ResultExt;
//!
//! fn read_document(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::CardexError;
use crate::domain::result::Result;
use std::fmt::Display;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context computed only when an error occurs
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CardexError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| e.into().prefixed(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().prefixed(f()))
    }
}

impl CardexError {
    /// Prefixes the message, keeping the variant
    ///
    /// `UserCancelled` and fetch errors carry no free-form message and are
    /// returned unchanged.
    fn prefixed(self, context: impl Display) -> Self {
        let wrap = |msg: String| format!("{context}: {msg}");
        match self {
            CardexError::Configuration(m) => CardexError::Configuration(wrap(m)),
            CardexError::Validation(m) => CardexError::Validation(wrap(m)),
            CardexError::Store(m) => CardexError::Store(wrap(m)),
            CardexError::Render(m) => CardexError::Render(wrap(m)),
            CardexError::Persistence(m) => CardexError::Persistence(wrap(m)),
            CardexError::ArchiveSave(m) => CardexError::ArchiveSave(wrap(m)),
            CardexError::Export(m) => CardexError::Export(wrap(m)),
            CardexError::Io(m) => CardexError::Io(wrap(m)),
            CardexError::Serialization(m) => CardexError::Serialization(wrap(m)),
            other @ (CardexError::ImageFetch(_) | CardexError::UserCancelled) => other,
        }
    }
}
