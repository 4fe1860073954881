//! Selection capture pipeline
//!
//! Raw fragment rectangles from the platform oracle are clipped to the
//! owning page, normalized to page-relative percentages, and merged into
//! per-line rectangles. A drag that crosses a page boundary keeps only
//! the geometry inside the page owning the selection start.

use crate::annotations::PageIndex;
use crate::geometry::{merge_rects, Rect};

use super::source::RawSelection;

/// Vertical gap between a selection's last line and its tooltip anchor,
/// in page-height percent.
const TOOLTIP_GAP_PERCENT: f64 = 1.2;

/// Where the action affordance should appear: trailing the end of the
/// user's selection rather than the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipAnchor {
    pub x_percent: f64,
    pub y_percent: f64,
}

/// A captured, normalized selection. Transient: lives only between a
/// pointer release and the next clearing event, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSelection {
    pub page: PageIndex,
    pub text: String,
    pub rects: Vec<Rect>,
    pub tooltip: TooltipAnchor,
}

/// Normalize a raw selection snapshot into a [`TextSelection`].
///
/// Returns `None` for every geometry edge case: whitespace-only text,
/// fragments entirely outside the owning page, or nothing surviving the
/// clamp. An empty-selection value is never produced.
pub fn capture(raw: &RawSelection) -> Option<TextSelection> {
    let text = raw.text.trim();
    if text.is_empty() {
        return None;
    }

    let mut normalized = Vec::with_capacity(raw.fragments.len());
    for fragment in &raw.fragments {
        if let Some(clamped) = fragment.clamp_to(&raw.page_bounds) {
            normalized.push(clamped.to_page_percent(&raw.page_bounds));
        }
    }
    if normalized.is_empty() {
        tracing::debug!(page = raw.page, "selection had no fragments inside its page");
        return None;
    }

    let rects = merge_rects(&normalized);
    let tooltip = tooltip_anchor(&rects);

    Some(TextSelection {
        page: raw.page,
        text: text.to_string(),
        rects,
        tooltip,
    })
}

/// Anchor below the last merged rectangle, horizontally centered on it.
fn tooltip_anchor(rects: &[Rect]) -> TooltipAnchor {
    let last = &rects[rects.len() - 1];
    TooltipAnchor {
        x_percent: last.x + last.width / 2.0,
        y_percent: last.bottom() + TOOLTIP_GAP_PERCENT,
    }
}
