//! Direct folder access
//!
//! - [`DirectoryProvider`] - grants a [`DirectoryHandle`], or reports cancellation
//! - [`FsDirectoryProvider`] - fixed directory from configuration
//! - [`PromptDirectoryProvider`] - asks on the terminal

pub mod fs;
pub mod traits;

pub use fs::{FsDirectoryHandle, FsDirectoryProvider, PromptDirectoryProvider};
pub use traits::{DirectoryHandle, DirectoryProvider};
