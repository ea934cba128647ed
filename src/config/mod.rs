//! Configuration management for Cardex.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Cardex uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CARDEX_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cardex::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cardex.toml")?;
//!
//! println!("Document: {}", config.document.path);
//! println!("Format: {}", config.export.format);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`DocumentConfig`] - Card document path
//! - [`ExportConfig`] - Format, scale, mode, target, concurrency, pacing
//! - [`EstimateConfig`] - Size estimate debounce
//! - [`FetchConfig`] - Image fetch timeout and user agent
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [document]
//! path = "cards.json"
//!
//! [export]
//! format = "png"
//! scale = 2
//! mode = "multiple"
//! target = "folder"
//! folder_name = "${CARDEX_FOLDER}"
//! output_dir = "./exports"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, CardexConfig, DocumentConfig, EstimateConfig, ExportConfig, FetchConfig,
    LoggingConfig,
};
