//! Domain models and types for Cardex.
//!
//! The domain layer provides:
//! - **Card documents** ([`Card`], [`Node`], [`CardDescriptor`])
//! - **Export jobs** ([`ExportJob`], [`ImageFormat`], [`ExportMode`], [`ExportTarget`])
//! - **Naming configuration** ([`NamingConfig`], [`NamingPart`])
//! - **Outcomes** ([`RenderedFile`], [`ExportOutcome`])
//! - **Error types** ([`CardexError`], [`FetchError`]) and the [`Result`] alias
//!
//! # Builder Pattern
//!
//! Jobs are constructed with a builder:
//!
//! ```rust
//! use cardex::domain::{ExportJob, ExportTarget, ImageFormat};
//!
//! # fn example() -> Result<(), String> {
//! let job = ExportJob::builder()
//!     .format(ImageFormat::Jpeg)
//!     .scale(3)
//!     .target(ExportTarget::Folder)
//!     .folder_name("launch-deck")
//!     .build()?;
//! assert_eq!(job.scale, 3);
//! # Ok(())
//! # }
//! ```

pub mod card;
pub mod context;
pub mod errors;
pub mod job;
pub mod naming;
pub mod outcome;
pub mod result;

// Re-export commonly used types for convenience
pub use card::{
    export_ignore_predicate, Card, CardDescriptor, CardHandle, ExcludePredicate, Node, NodePath,
    EXPORT_IGNORE_CLASS,
};
pub use errors::{CardexError, FetchError};
pub use job::{ExportJob, ExportJobBuilder, ExportMode, ExportTarget, ImageFormat};
pub use naming::{DateFormat, NamingConfig, NamingPart, NumberOrder, Numeral};
pub use outcome::{BackendKind, ExportOutcome, RenderedFile};
pub use result::Result;
