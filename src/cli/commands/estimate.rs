//! Estimate command implementation
//!
//! Projects the single-file and total size of an export by rendering the
//! first card once.

use crate::adapters::factory::create_collaborators;
use crate::cli::{EXIT_CONFIG, EXIT_EXPORT_FAILED, EXIT_OK};
use crate::config::load_config;
use crate::core::estimate::{preview_size, SizePreview, SizeReading};
use crate::domain::ImageFormat;
use clap::Args;

/// Arguments for the estimate command
#[derive(Args, Debug, Default)]
pub struct EstimateArgs {
    /// Image format to estimate (defaults to the configured one)
    #[arg(long)]
    pub format: Option<ImageFormat>,

    /// Pixel scale to estimate (defaults to the configured one)
    #[arg(long)]
    pub scale: Option<u32>,
}

impl EstimateArgs {
    /// Execute the estimate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Some(format) = self.format {
            config.export.format = format;
        }
        if let Some(scale) = self.scale {
            config.export.scale = scale;
        }
        if let Err(e) = config.validate() {
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let collaborators = match create_collaborators(&config).await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to open card document: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let format = config.export.format;
        let scale = config.export.scale;
        tracing::info!(format = %format, scale, "Estimating export size");

        let estimate = preview_size(
            collaborators.store.as_ref(),
            collaborators.renderer.as_ref(),
            format,
            scale,
        )
        .await;

        println!("Size estimate ({format} @ {scale}x):");
        match estimate {
            Ok(Some(estimate)) => {
                let preview = estimate.preview();
                print_preview(&preview);
                println!("  Cards: {}", estimate.cards);
                Ok(EXIT_OK)
            }
            Ok(None) => {
                print_preview(&SizePreview::default());
                println!("  Cards: 0");
                Ok(EXIT_OK)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Size estimate failed");
                print_preview(&SizePreview {
                    single: SizeReading::Error,
                    total: SizeReading::Error,
                });
                Ok(EXIT_EXPORT_FAILED)
            }
        }
    }
}

fn print_preview(preview: &SizePreview) {
    println!("  Single file: {}", preview.single);
    println!("  Total: {}", preview.total);
}
