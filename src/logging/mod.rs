//! Logging and observability
//!
//! Structured logging via `tracing`:
//! - Console output with an `EnvFilter`
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use cardex::logging::init_logging;
//! use cardex::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export run
///
/// # Example
///
/// ```no_run
/// use cardex::log_export_start;
/// use cardex::domain::{BackendKind, ExportJob};
///
/// let job = ExportJob::builder().build().unwrap();
/// log_export_start!(&job, 12, BackendKind::Archive);
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($job:expr, $cards:expr, $backend:expr) => {
        tracing::info!(
            job_id = %$job.id,
            cards = $cards,
            backend = %$backend,
            format = %$job.format,
            scale = $job.scale,
            "Starting export"
        );
    };
}

/// Log the completion of an export run
///
/// # Example
///
/// ```no_run
/// use cardex::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log a restart on the archive backend after a folder failure
///
/// # Example
///
/// ```no_run
/// use cardex::log_fallback;
/// use cardex::domain::CardexError;
///
/// let error = CardexError::Persistence("disk full".to_string());
/// log_fallback!(&error);
/// ```
#[macro_export]
macro_rules! log_fallback {
    ($error:expr) => {
        tracing::warn!(
            error = %$error,
            "Folder export failed, restarting on archive backend"
        );
    };
}
