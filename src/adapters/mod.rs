//! External system integrations for Cardex.
//!
//! - [`store`] - Card document source
//! - [`renderer`] - Card rasterization
//! - [`fetch`] - Image retrieval for inlining (HTTP and local files)
//! - [`directory`] - Directory access for folder exports
//! - [`download`] - Saving archives and single files
//! - [`factory`] - Builds the production collaborators from configuration
//!
//! # Design Pattern
//!
//! Each adapter is a trait with a production implementation, so the export
//! pipeline can be driven by mock collaborators in tests.

pub mod directory;
pub mod download;
pub mod factory;
pub mod fetch;
pub mod renderer;
pub mod store;
