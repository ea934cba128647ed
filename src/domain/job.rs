//! Export job model
//!
//! An [`ExportJob`] captures every option of one export run. It is built fresh
//! for each run and never reused, even when the options are identical.

use super::naming::NamingConfig;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Archive name used when the job has no folder name
pub const DEFAULT_FOLDER_NAME: &str = "cards-export";

/// Encoded image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless PNG
    #[default]
    Png,
    /// JPEG at quality 90
    Jpeg,
}

impl ImageFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    /// MIME type of the encoded bytes
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            other => Err(format!("Invalid format '{other}'. Must be one of: png, jpeg")),
        }
    }
}

/// Whether cards are saved one by one or as a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Each card saved individually, sequentially
    Single,
    /// All cards saved through the archive or folder backend
    #[default]
    Multiple,
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Single => f.write_str("single"),
            ExportMode::Multiple => f.write_str("multiple"),
        }
    }
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(ExportMode::Single),
            "multiple" => Ok(ExportMode::Multiple),
            other => Err(format!("Invalid mode '{other}'. Must be one of: single, multiple")),
        }
    }
}

/// Where a multiple-mode export is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    /// One zip archive
    #[default]
    Archive,
    /// Individual files in a user-granted directory
    Folder,
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportTarget::Archive => f.write_str("archive"),
            ExportTarget::Folder => f.write_str("folder"),
        }
    }
}

impl FromStr for ExportTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "archive" | "zip" => Ok(ExportTarget::Archive),
            "folder" | "directory" => Ok(ExportTarget::Folder),
            other => Err(format!(
                "Invalid target '{other}'. Must be one of: archive, folder"
            )),
        }
    }
}

/// One export run
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Unique run identifier
    pub id: Uuid,

    /// Encoded image format
    pub format: ImageFormat,

    /// Pixel ratio, at least 1
    pub scale: u32,

    /// Single or multiple
    pub mode: ExportMode,

    /// Archive or folder
    pub target: ExportTarget,

    /// Archive name or nested folder name (may be empty)
    pub folder_name: String,

    /// Naming configuration read from the document store
    pub naming: NamingConfig,

    /// Local timestamp shared by every file name of this run
    pub started_at: NaiveDateTime,
}

impl ExportJob {
    /// Creates a new builder for constructing an ExportJob
    pub fn builder() -> ExportJobBuilder {
        ExportJobBuilder::default()
    }

    /// Archive file name for this job
    pub fn archive_name(&self) -> String {
        let base = if self.folder_name.trim().is_empty() {
            DEFAULT_FOLDER_NAME
        } else {
            self.folder_name.trim()
        };
        format!("{base}.zip")
    }
}

/// Builder for constructing ExportJob instances
#[derive(Debug, Default)]
pub struct ExportJobBuilder {
    format: Option<ImageFormat>,
    scale: Option<u32>,
    mode: Option<ExportMode>,
    target: Option<ExportTarget>,
    folder_name: Option<String>,
    naming: Option<NamingConfig>,
    started_at: Option<NaiveDateTime>,
}

impl ExportJobBuilder {
    /// Sets the image format
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the pixel scale
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the export mode
    pub fn mode(mut self, mode: ExportMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the persistence target
    pub fn target(mut self, target: ExportTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the archive / folder name
    pub fn folder_name(mut self, folder_name: impl Into<String>) -> Self {
        self.folder_name = Some(folder_name.into());
        self
    }

    /// Sets the naming configuration
    pub fn naming(mut self, naming: NamingConfig) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Pins the timestamp used for date and time name tokens
    pub fn started_at(mut self, started_at: NaiveDateTime) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Builds the job
    ///
    /// # Errors
    ///
    /// Returns an error if the scale is zero.
    pub fn build(self) -> Result<ExportJob, String> {
        let scale = self.scale.unwrap_or(2);
        if scale == 0 {
            return Err("scale must be at least 1".to_string());
        }

        Ok(ExportJob {
            id: Uuid::new_v4(),
            format: self.format.unwrap_or_default(),
            scale,
            mode: self.mode.unwrap_or_default(),
            target: self.target.unwrap_or_default(),
            folder_name: self
                .folder_name
                .unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string()),
            naming: self.naming.unwrap_or_default(),
            started_at: self.started_at.unwrap_or_else(|| Local::now().naive_local()),
        })
    }
}
