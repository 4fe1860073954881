//! Page render coordination
//!
//! The asynchronous boundary to the page-rendering collaborator and the
//! coordinator that tracks which pages have stable pixel dimensions.
//! The engine tolerates partially-rendered documents at all times.

mod coordinator;
mod rasterizer;

pub use coordinator::RenderCoordinator;
pub use rasterizer::{PageRaster, PageRasterizer, RasterizeError, DEFAULT_SCALE};
