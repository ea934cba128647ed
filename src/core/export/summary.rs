//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::{BackendKind, CardexError, ExportOutcome};
use std::time::Duration;
use uuid::Uuid;

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Run identifier
    pub job_id: Uuid,

    /// Number of cards in the document
    pub total_cards: usize,

    /// Number of files persisted by the backend that completed
    pub files_written: usize,

    /// Backend that produced the files, if any
    pub backend: Option<BackendKind>,

    /// Error that made the run fall back to the archive
    pub fallback_cause: Option<String>,

    /// Duration of the export
    pub duration: Duration,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,

    /// Terminal state
    pub outcome: ExportOutcome,
}

impl ExportSummary {
    /// Create a new summary for a run that has not finished yet
    pub fn new(job_id: Uuid) -> Self {
        Self {
            job_id,
            total_cards: 0,
            files_written: 0,
            backend: None,
            fallback_cause: None,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
            outcome: ExportOutcome::Failed {
                error: "export did not finish".to_string(),
            },
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Records the terminal outcome and the counters derived from it
    pub fn set_outcome(&mut self, outcome: ExportOutcome) {
        if let ExportOutcome::Completed {
            files,
            backend,
            fallback_cause,
        } = &outcome
        {
            self.files_written = *files;
            self.backend = Some(*backend);
            self.fallback_cause = fallback_cause.clone();
        }
        self.outcome = outcome;
    }

    /// Check if the export completed (directly or after fallback)
    pub fn is_successful(&self) -> bool {
        self.outcome.is_completed()
    }

    /// Share of cards that ended up persisted, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_cards == 0 {
            return 100.0;
        }
        (self.files_written as f64 / self.total_cards as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            job_id = %self.job_id,
            total_cards = self.total_cards,
            files_written = self.files_written,
            backend = ?self.backend,
            fell_back = self.fallback_cause.is_some(),
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export summary"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export finished with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = ?error.context,
                    "Export error"
                );
            }
        }
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Document store could not be read
    Store,
    /// A card failed to render
    Render,
    /// Direct-folder access or write failed
    Persistence,
    /// Archive could not be built or saved
    Archive,
    /// Single-mode save failed
    Save,
    /// Anything else
    Unknown,
}

impl ExportErrorType {
    /// Classifies a domain error
    pub fn classify(error: &CardexError) -> Self {
        match error {
            CardexError::Store(_) => ExportErrorType::Store,
            CardexError::Render(_) => ExportErrorType::Render,
            CardexError::Persistence(_) => ExportErrorType::Persistence,
            CardexError::ArchiveSave(_) => ExportErrorType::Archive,
            CardexError::Io(_) => ExportErrorType::Save,
            _ => ExportErrorType::Unknown,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (backend, card)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Builds an export error from a domain error
    pub fn from_error(error: &CardexError) -> Self {
        Self::new(ExportErrorType::classify(error), error.to_string())
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}
