// Cardex - Card Batch Exporter
// Copyright (c) 2025 Cardex Contributors
// Licensed under the MIT License

//! # Cardex - card batch exporter
//!
//! Cardex renders every card of a document to PNG or JPEG and saves the
//! results as individual files, as one zip archive, or straight into a
//! directory.
//!
//! ## Overview
//!
//! - **Inlining** external images as data URIs for the duration of a render,
//!   restoring the original sources afterwards
//! - **Scheduling** renders under a concurrency ceiling, continuously or in
//!   chunks
//! - **Persisting** through an archive or direct-folder backend, falling back
//!   to the archive when the folder path fails
//! - **Estimating** output size with a debounced, superseding probe render
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export orchestration, inlining, naming and size estimation
//! - [`adapters`] - Renderer, document store, image fetcher, directory and
//!   download integrations
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardex::adapters::factory::create_collaborators;
//! use cardex::config::load_config;
//! use cardex::core::export::{ExportCoordinator, ExportSettings};
//! use cardex::domain::{ExportJob, ExportTarget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("cardex.toml")?;
//!     let collaborators = create_collaborators(&config).await?;
//!     let naming = collaborators.store.naming_config().await?;
//!
//!     let coordinator =
//!         ExportCoordinator::new(collaborators, ExportSettings::from_config(&config.export));
//!     let job = ExportJob::builder()
//!         .target(ExportTarget::Folder)
//!         .naming(naming)
//!         .build()?;
//!
//!     let outcome = coordinator.start_export(job)?.wait().await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Cardex uses the [`domain::CardexError`] type for all errors. Image fetch
//! failures are recovered inside the inliner; a dismissed directory request
//! ends the export silently; any other folder failure restarts the export on
//! the archive backend.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
