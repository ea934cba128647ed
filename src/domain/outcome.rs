//! Rendered files and terminal export outcomes

use serde::Serialize;
use std::fmt;

/// Unit exchanged between the scheduler and a persistence backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Full file name including the extension
    pub name: String,

    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

impl RenderedFile {
    /// Creates a rendered file
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Persistence strategy that produced the files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Single zip archive
    Archive,
    /// Files written into a granted directory
    DirectFolder,
    /// Files saved one by one (single mode)
    Individual,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Archive => "archive",
            BackendKind::DirectFolder => "direct_folder",
            BackendKind::Individual => "individual",
        };
        f.write_str(name)
    }
}

/// Terminal state of one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Every card was rendered and persisted
    ///
    /// `fallback_cause` is set when the folder backend failed and the run was
    /// restarted on the archive backend.
    Completed {
        files: usize,
        backend: BackendKind,
        fallback_cause: Option<String>,
    },

    /// The directory prompt was dismissed; nothing was rendered or written
    CancelledByUser,

    /// Render or archive failure with no further fallback
    Failed { error: String },
}

impl ExportOutcome {
    /// Whether the run completed, directly or via fallback
    pub fn is_completed(&self) -> bool {
        matches!(self, ExportOutcome::Completed { .. })
    }

    /// Whether the run completed only after falling back to the archive
    pub fn fell_back(&self) -> bool {
        matches!(
            self,
            ExportOutcome::Completed {
                fallback_cause: Some(_),
                ..
            }
        )
    }
}
