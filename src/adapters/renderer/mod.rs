//! Card rendering
//!
//! - [`Renderer`] - rasterizer interface consumed by the export pipeline
//! - [`RasterRenderer`] - CPU implementation on top of the `image` crate

pub mod raster;
pub mod traits;

pub use raster::RasterRenderer;
pub use traits::{RenderOptions, Renderer};
