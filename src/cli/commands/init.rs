//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "cardex.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("Initializing Cardex configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [document].path at your card document");
                println!("  2. Validate configuration: cardex validate-config");
                println!("  3. Check the output size: cardex estimate");
                println!("  4. Run export: cardex export");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Cardex Configuration File

[application]
log_level = "info"

[document]
path = "cards.json"

[export]
format = "png"
scale = 2
mode = "multiple"
target = "archive"
folder_name = "cards-export"
output_dir = "./exports"

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Cardex Configuration File
#
# Values may reference environment variables with ${VAR}. Any setting can
# also be overridden with CARDEX_<SECTION>_<KEY>, e.g. CARDEX_EXPORT_SCALE.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Card Document
# ============================================================================
[document]
# JSON document holding the cards and the naming configuration.
# Relative image paths inside it resolve against its directory.
path = "cards.json"

# ============================================================================
# Export Configuration
# ============================================================================
[export]
# Image format: "png" or "jpeg"
format = "png"

# Pixel ratio (1-10)
scale = 2

# "single": every card saved as its own file, one after another
# "multiple": all cards saved through the target below
mode = "multiple"

# "archive": one zip file
# "folder": files written straight into a directory; falls back to the
#           archive if anything goes wrong
target = "archive"

# Archive name, or the folder created inside the chosen directory.
# Leave empty to write into the chosen directory itself.
folder_name = "cards-export"

# Where archives and single files are saved, and the default folder target
output_dir = "./exports"

# Ask for the folder-export directory on the terminal
prompt_for_directory = false

# Renders in flight on the folder path (1-16)
concurrency_limit = 3

# Renders per batch on the archive path
chunk_size = 3

# Pause between two single-mode saves
pacing_delay_ms = 200

# How long the success indicator stays up
success_display_ms = 3000

# ============================================================================
# Size Estimate
# ============================================================================
[estimate]
# Quiet period before a probe render starts
debounce_ms = 500

# ============================================================================
# Image Fetching
# ============================================================================
[fetch]
# Timeout for remote images, in seconds
timeout_seconds = 30

# User-Agent sent with remote image requests
# user_agent = "cardex/0.4.0"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Log directory
local_path = "./logs"

# Rotation: daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "cardex.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "cardex.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_are_valid() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = load_config_from_str(&content).unwrap();
            assert_eq!(config.document.path, "cards.json");
            assert_eq!(config.export.scale, 2);
        }
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("cardex.toml");
        std::fs::write(&output, "").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
    }
}
