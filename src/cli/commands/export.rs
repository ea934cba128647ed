//! Export command implementation
//!
//! This module implements the `export` command, which renders every card of
//! the configured document and saves the files.

use crate::adapters::factory::create_collaborators;
use crate::cli::{EXIT_CANCELLED, EXIT_CONFIG, EXIT_EXPORT_FAILED, EXIT_FATAL, EXIT_OK};
use crate::config::{load_config, CardexConfig};
use crate::core::export::{ExportCoordinator, ExportSettings, ExportState, ExportStatus};
use crate::domain::{ExportJob, ExportMode, ExportOutcome, ExportTarget, ImageFormat};
use clap::Args;
use std::io::{self, Write};
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Override image format (png or jpeg)
    #[arg(long)]
    pub format: Option<ImageFormat>,

    /// Override pixel scale (1-10)
    #[arg(long)]
    pub scale: Option<u32>,

    /// Override export mode (single or multiple)
    #[arg(long)]
    pub mode: Option<ExportMode>,

    /// Override export target (archive or folder)
    #[arg(long)]
    pub target: Option<ExportTarget>,

    /// Override archive / nested folder name
    #[arg(long)]
    pub folder_name: Option<String>,

    /// Override output directory
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Applies the CLI overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut CardexConfig) {
        if let Some(format) = self.format {
            tracing::info!(format = %format, "Overriding image format from CLI");
            config.export.format = format;
        }
        if let Some(scale) = self.scale {
            tracing::info!(scale, "Overriding scale from CLI");
            config.export.scale = scale;
        }
        if let Some(mode) = self.mode {
            tracing::info!(mode = %mode, "Overriding export mode from CLI");
            config.export.mode = mode;
        }
        if let Some(target) = self.target {
            tracing::info!(target = %target, "Overriding export target from CLI");
            config.export.target = target;
        }
        if let Some(folder_name) = &self.folder_name {
            config.export.folder_name = folder_name.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
    }

    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let collaborators = match create_collaborators(&config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open card document");
                eprintln!("Failed to open card document: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let naming = collaborators.store.naming_config().await?;
        let card_count = collaborators.store.list_cards().await?.len();

        if !self.yes {
            println!("Export Configuration:");
            println!("  Document: {} ({card_count} cards)", config.document.path);
            println!("  Format: {} @ {}x", config.export.format, config.export.scale);
            println!("  Mode: {}", config.export.mode);
            if config.export.mode == ExportMode::Multiple {
                println!("  Target: {}", config.export.target);
            }
            println!("  Output: {}", config.export.output_dir);
            println!();
            print!("Proceed with export? [y/N]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(EXIT_CANCELLED);
            }
        }

        let job = ExportJob::builder()
            .format(config.export.format)
            .scale(config.export.scale)
            .mode(config.export.mode)
            .target(config.export.target)
            .folder_name(config.export.folder_name.clone())
            .naming(naming)
            .build()
            .map_err(anyhow::Error::msg)?;

        let coordinator =
            ExportCoordinator::new(collaborators, ExportSettings::from_config(&config.export));

        println!("Starting export...");
        let handle = match coordinator.start_export(job) {
            Ok(h) => h,
            Err(e) => {
                eprintln!("Failed to start export: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let printer = tokio::spawn(print_progress(handle.subscribe()));
        let summary = handle.wait_summary().await?;
        printer.abort();

        println!();
        println!("Export Summary:");
        println!("  Cards: {}", summary.total_cards);
        println!("  Files Written: {}", summary.files_written);
        if let Some(backend) = summary.backend {
            println!("  Backend: {backend}");
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        if !summary.errors.is_empty() {
            println!("Errors encountered:");
            for error in &summary.errors {
                println!("  - {:?}: {}", error.error_type, error.message);
                if let Some(context) = &error.context {
                    println!("    Context: {context}");
                }
            }
            println!();
        }

        let exit_code = match &summary.outcome {
            ExportOutcome::Completed {
                fallback_cause: Some(cause),
                ..
            } => {
                println!("Folder export failed ({cause}); saved a zip archive instead.");
                EXIT_OK
            }
            ExportOutcome::Completed { .. } => {
                println!("Export completed successfully!");
                EXIT_OK
            }
            ExportOutcome::CancelledByUser => {
                println!("Export cancelled.");
                EXIT_CANCELLED
            }
            ExportOutcome::Failed { error } => {
                eprintln!("Export failed: {error}");
                EXIT_EXPORT_FAILED
            }
        };

        Ok(exit_code)
    }
}

/// Prints a line each time the progress or backend changes
async fn print_progress(mut status: watch::Receiver<ExportStatus>) {
    let mut last = (ExportState::Idle, u8::MAX);
    while status.changed().await.is_ok() {
        let current = status.borrow_and_update().clone();
        if let ExportState::Running { backend, fallback } = current.state {
            if (current.state, current.progress) != last {
                let note = if fallback { " (fallback)" } else { "" };
                println!("  [{backend}{note}] {:>3}%", current.progress);
                last = (current.state, current.progress);
            }
        }
    }
}
