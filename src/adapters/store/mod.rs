//! Card document stores

pub mod json;
pub mod traits;

pub use json::{CardDocument, JsonDocumentStore};
pub use traits::DocumentStore;
