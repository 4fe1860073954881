//! Selection geometry
//!
//! The two coordinate spaces the engine moves between (device pixels and
//! page-relative percentages) plus the line-box merge that collapses
//! fragmented selection rectangles.

mod merge;
mod rect;

pub use merge::merge_rects;
pub use rect::{PixelRect, Rect};
