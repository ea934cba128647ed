//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Cardex using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Exit code of a successful command
pub const EXIT_OK: i32 = 0;

/// Exit code when the user cancels
pub const EXIT_CANCELLED: i32 = 1;

/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;

/// Exit code when the export itself fails
pub const EXIT_EXPORT_FAILED: i32 = 3;

/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;

/// Cardex - card batch exporter
#[derive(Parser, Debug)]
#[command(name = "cardex")]
#[command(version, about, long_about = None)]
#[command(author = "Cardex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cardex.toml", env = "CARDEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CARDEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every card of the document and save the files
    Export(commands::export::ExportArgs),

    /// Project the size of an export
    Estimate(commands::estimate::EstimateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
