//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Cardex configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a load failure covers both parse and
    /// validation errors.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Document: {}", config.document.path);
        println!("  Format: {}", config.export.format);
        println!("  Scale: {}", config.export.scale);
        println!("  Mode: {}", config.export.mode);
        println!("  Target: {}", config.export.target);
        println!("  Folder Name: {}", config.export.folder_name);
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Concurrency Limit: {}", config.export.concurrency_limit);
        println!("  Chunk Size: {}", config.export.chunk_size);
        println!(
            "  Prompt For Directory: {}",
            config.export.prompt_for_directory
        );
        println!("  Fetch Timeout: {}s", config.fetch.timeout_seconds);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(EXIT_OK)
    }
}
