//! Platform selection oracle
//!
//! The platform's selection/range machinery is an external capability.
//! A rendering surface implements [`SelectionSource`] by resolving the
//! current selection's owning page (walking the start anchor's
//! containment chain up to a page surface) and reporting the raw
//! fragment geometry in device pixels. Everything downstream of that
//! (clipping, normalization, merging) is platform independent.

use crate::annotations::PageIndex;
use crate::geometry::PixelRect;

/// A raw, device-pixel snapshot of the platform's current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSelection {
    /// The page owning the selection's start anchor.
    pub page: PageIndex,
    /// The owning page's bounding box, in the same device-pixel space as
    /// the fragments.
    pub page_bounds: PixelRect,
    /// The selected text.
    pub text: String,
    /// Client rectangles for the full range. Any positive count,
    /// including many per visual line for kerned or wrapped text.
    pub fragments: Vec<PixelRect>,
}

/// Capability interface over the platform selection API.
pub trait SelectionSource {
    /// The current non-collapsed selection, or `None` when there is no
    /// selection, the selection is collapsed, or it starts outside any
    /// page surface.
    fn current_selection(&self) -> Option<RawSelection>;

    /// Drop the platform's native selection highlight so the computed
    /// overlay is the only visible one.
    fn clear_native_selection(&mut self);
}
