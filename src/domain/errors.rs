//! Domain error types
//!
//! This module defines the error hierarchy for Cardex. Errors are domain-specific
//! and don't expose third-party types to callers.

use thiserror::Error;

/// Main Cardex error type
///
/// This is the primary error type used throughout the application.
/// Each variant maps onto one recovery policy of the export pipeline.
#[derive(Debug, Error)]
pub enum CardexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (jobs, naming, documents)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document store errors
    #[error("Document store error: {0}")]
    Store(String),

    /// Renderer rejected a card
    #[error("Render error: {0}")]
    Render(String),

    /// A single image could not be fetched for inlining
    #[error("Image fetch error: {0}")]
    ImageFetch(#[from] FetchError),

    /// The user declined the directory prompt
    #[error("Export cancelled by user")]
    UserCancelled,

    /// Direct-folder persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Archive could not be built or saved
    #[error("Archive save error: {0}")]
    ArchiveSave(String),

    /// Export orchestration errors
    #[error("Export error: {0}")]
    Export(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CardexError {
    /// Whether this error came from the directory prompt being dismissed
    pub fn is_user_cancelled(&self) -> bool {
        matches!(self, CardexError::UserCancelled)
    }
}

/// Image fetch errors
///
/// Errors that occur while downloading an image for inlining. They are
/// recovered locally: the image keeps its original source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Source could not be interpreted as a URL or path
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),

    /// Transport failure
    #[error("Request failed for {url}: {message}")]
    RequestFailed { url: String, message: String },

    /// Server answered with a non-success status
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Local file could not be read
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for CardexError {
    fn from(err: std::io::Error) -> Self {
        CardexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CardexError {
    fn from(err: serde_json::Error) -> Self {
        CardexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CardexError {
    fn from(err: toml::de::Error) -> Self {
        CardexError::Configuration(format!("TOML parse error: {err}"))
    }
}

// HTTP errors only surface while fetching images
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        match err.status() {
            Some(status) => FetchError::Status {
                url,
                status: status.as_u16(),
            },
            None => FetchError::RequestFailed {
                url,
                message: err.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for CardexError {
    fn from(err: reqwest::Error) -> Self {
        CardexError::ImageFetch(err.into())
    }
}

// Archive writer errors only surface while building the archive
impl From<zip::result::ZipError> for CardexError {
    fn from(err: zip::result::ZipError) -> Self {
        CardexError::ArchiveSave(err.to_string())
    }
}

// Encoder/decoder errors only surface while rendering
impl From<image::ImageError> for CardexError {
    fn from(err: image::ImageError) -> Self {
        CardexError::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardex_error_display() {
        let err = CardexError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_user_cancelled_display() {
        let err = CardexError::UserCancelled;
        assert_eq!(err.to_string(), "Export cancelled by user");
        assert!(err.is_user_cancelled());
        assert!(!CardexError::Persistence("denied".to_string()).is_user_cancelled());
    }

    #[test]
    fn test_fetch_error_conversion() {
        let fetch_err = FetchError::Status {
            url: "https://example.com/a.png".to_string(),
            status: 404,
        };
        let err: CardexError = fetch_err.into();
        assert!(matches!(err, CardexError::ImageFetch(_)));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: CardexError = io_err.into();
        assert!(matches!(err, CardexError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: CardexError = json_err.into();
        assert!(matches!(err, CardexError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: CardexError = toml_err.into();
        assert!(matches!(err, CardexError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_zip_error_conversion() {
        let zip_err = zip::result::ZipError::FileNotFound;
        let err: CardexError = zip_err.into();
        assert!(matches!(err, CardexError::ArchiveSave(_)));
    }
}
