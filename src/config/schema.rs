//! Configuration schema types
//!
//! This module defines the configuration structure for Cardex.

use crate::domain::{ExportMode, ExportTarget, ImageFormat};
use serde::{Deserialize, Serialize};

/// Main Cardex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Card document location
    #[serde(default)]
    pub document: DocumentConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Size estimate settings
    #[serde(default)]
    pub estimate: EstimateConfig,

    /// Image fetch settings used while inlining
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CardexConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.document.validate()?;
        self.export.validate()?;
        self.estimate.validate()?;
        self.fetch.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Card document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path to the JSON card document
    #[serde(default = "default_document_path")]
    pub path: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: default_document_path(),
        }
    }
}

impl DocumentConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("document.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Image format (png or jpeg)
    #[serde(default)]
    pub format: ImageFormat,

    /// Pixel scale applied to the card size (1-10)
    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Export mode (single or multiple)
    #[serde(default)]
    pub mode: ExportMode,

    /// Persistence target for multiple mode (archive or folder)
    #[serde(default)]
    pub target: ExportTarget,

    /// Archive name, or nested folder name for folder exports
    #[serde(default = "default_folder_name")]
    pub folder_name: String,

    /// Directory receiving archives and single-mode files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Maximum cards rendered at the same time on the folder path (1-16)
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Cards rendered per chunk on the archive path
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Delay between two single-mode saves in milliseconds
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,

    /// How long the success indicator stays visible in milliseconds
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,

    /// Ask for the folder on the terminal instead of using `output_dir`
    #[serde(default)]
    pub prompt_for_directory: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            scale: default_scale(),
            mode: ExportMode::default(),
            target: ExportTarget::default(),
            folder_name: default_folder_name(),
            output_dir: default_output_dir(),
            concurrency_limit: default_concurrency_limit(),
            chunk_size: default_chunk_size(),
            pacing_delay_ms: default_pacing_delay_ms(),
            success_display_ms: default_success_display_ms(),
            prompt_for_directory: false,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if !(1..=10).contains(&self.scale) {
            return Err(format!(
                "export.scale must be between 1 and 10, got {}",
                self.scale
            ));
        }

        if !(1..=16).contains(&self.concurrency_limit) {
            return Err(format!(
                "export.concurrency_limit must be between 1 and 16, got {}",
                self.concurrency_limit
            ));
        }

        if self.chunk_size == 0 {
            return Err("export.chunk_size must be > 0".to_string());
        }

        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Size estimate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateConfig {
    /// Quiet period before a probe render starts, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl EstimateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.debounce_ms > 10_000 {
            return Err(format!(
                "estimate.debounce_ms must be <= 10000, got {}",
                self.debounce_ms
            ));
        }
        Ok(())
    }
}

/// Image fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with image requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("fetch.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_document_path() -> String {
    "cards.json".to_string()
}

fn default_scale() -> u32 {
    2
}

fn default_folder_name() -> String {
    crate::domain::job::DEFAULT_FOLDER_NAME.to_string()
}

fn default_output_dir() -> String {
    "./exports".to_string()
}

fn default_concurrency_limit() -> usize {
    3
}

fn default_chunk_size() -> usize {
    3
}

fn default_pacing_delay_ms() -> u64 {
    200
}

fn default_success_display_ms() -> u64 {
    3000
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("cardex/{}", env!("CARGO_PKG_VERSION"))
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
