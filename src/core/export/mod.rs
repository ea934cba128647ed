//! Export orchestration
//!
//! This module provides the export pipeline for Cardex, including:
//! - Bounded scheduling of render tasks
//! - Progress tracking
//! - Persistence backends (zip archive, direct folder)
//! - Export coordination with folder-to-archive fallback
//! - Summary and reporting

pub mod backend;
pub mod coordinator;
pub mod progress;
pub mod scheduler;
pub mod summary;

pub use backend::{ArchiveBackend, FolderBackend, PersistenceBackend};
pub use coordinator::{
    ExportCoordinator, ExportHandle, ExportSettings, ExportState, ExportStatus, FolderAttempt,
};
pub use progress::{percent, ProgressTracker};
pub use scheduler::{Admission, Scheduler};
pub use summary::{ExportError, ExportErrorType, ExportSummary};
