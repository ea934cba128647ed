//! Core business logic for Cardex.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration, scheduling, backends and fallback
//! - [`inline`] - Temporary inlining of external images around a render
//! - [`naming`] - File name generation
//! - [`estimate`] - Output size projection
//!
//! # Export Workflow
//!
//! 1. **List**: Read every card from the document store
//! 2. **Choose backend**: single files, direct folder or zip archive
//! 3. **Render**: Inline images, rasterize, restore the card
//! 4. **Persist**: Hand each file to the backend, tracking progress
//! 5. **Fall back**: Restart on the archive if the folder path fails
//! 6. **Report**: Publish the outcome and log a summary
//!
//! # Example
//!
//! ```rust,no_run
//! use cardex::adapters::factory::create_collaborators;
//! use cardex::config::load_config;
//! use cardex::core::export::{ExportCoordinator, ExportSettings};
//! use cardex::domain::ExportJob;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cardex.toml")?;
//! let collaborators = create_collaborators(&config).await?;
//! let coordinator =
//!     ExportCoordinator::new(collaborators, ExportSettings::from_config(&config.export));
//!
//! let handle = coordinator.start_export(ExportJob::builder().build()?)?;
//! let summary = handle.wait_summary().await?;
//! println!("Wrote {} files", summary.files_written);
//! # Ok(())
//! # }
//! ```

pub mod estimate;
pub mod export;
pub mod inline;
pub mod naming;
