//! Page rasterization boundary
//!
//! The engine never decodes page pixels itself. A rendering collaborator
//! implements [`PageRasterizer`]; the coordinator only needs the pixel
//! dimensions each rasterization yields, since all anchor math runs in
//! page-relative percentages against those dimensions.

use async_trait::async_trait;
use thiserror::Error;

use crate::annotations::PageIndex;

/// Default render scale (1.0 = 72 DPI).
pub const DEFAULT_SCALE: f32 = 1.5;

/// Rasterization failure taxonomy.
///
/// Cancellation is not a failure: a superseded request for the same page
/// resolves to `Cancelled` and must never be reported as an error.
#[derive(Debug, Error)]
pub enum RasterizeError {
    /// The request was superseded before completing.
    #[error("rasterization cancelled")]
    Cancelled,

    /// The page source could not be decoded.
    #[error("corrupt page source: {0}")]
    CorruptSource(String),

    /// The rendering collaborator failed for any other reason.
    #[error("render failed: {0}")]
    Failed(String),
}

impl RasterizeError {
    /// Whether this outcome is a cancellation rather than a genuine
    /// failure. Cancellations are swallowed at the boundary.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RasterizeError::Cancelled)
    }
}

/// Result of rasterizing one page: the stable pixel dimensions that
/// percentage math is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRaster {
    pub page: PageIndex,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Asynchronous page-rendering collaborator.
///
/// Rasterization is per page and may interleave arbitrarily across
/// pages; nothing may assume page N is ready because page N-1 is.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Total page count, once the document is open.
    async fn page_count(&self) -> Result<usize, RasterizeError>;

    /// Rasterize one page at the given scale, yielding its pixel
    /// dimensions.
    async fn rasterize(&self, page: PageIndex, scale: f32) -> Result<PageRaster, RasterizeError>;
}
