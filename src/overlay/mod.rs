//! Overlay reconstruction
//!
//! Computes, per page, the rectangles to paint over the rendered page:
//! persisted highlight anchors (clickable, tagged with their owning
//! annotation) plus the transient selection or pending highlight (never
//! clickable). Persisted anchors are re-merged through the same line-box
//! merge used at capture time, so a reloaded overlay is pixel-identical
//! to the freshly captured one without any cached merged form.

use crate::annotations::{Annotation, AnnotationId, Highlight, PageIndex};
use crate::geometry::{merge_rects, Rect};
use crate::selection::TextSelection;

/// What a painted rectangle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// A persisted highlight; reports its annotation on click.
    Persisted(AnnotationId),
    /// In-progress selection or not-yet-submitted highlight.
    Pending,
}

/// One rectangle of a page's overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub rect: Rect,
    pub kind: OverlayKind,
}

impl OverlayRect {
    /// The owning annotation for persisted rects; pending rects have none
    /// and are not click targets.
    pub fn annotation_id(&self) -> Option<AnnotationId> {
        match self.kind {
            OverlayKind::Persisted(id) => Some(id),
            OverlayKind::Pending => None,
        }
    }
}

/// Scroll destination for an annotation's first visible rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
    pub annotation: AnnotationId,
    pub page: PageIndex,
    pub rect: Rect,
}

/// Compute the overlay rectangles for one page.
///
/// The annotation list is an immutable snapshot for the render pass;
/// transient geometry is appended after the persisted anchors so it
/// paints on top.
pub fn overlay_for_page(
    page: PageIndex,
    annotations: &[Annotation],
    pending: Option<&Highlight>,
    selection: Option<&TextSelection>,
) -> Vec<OverlayRect> {
    let mut overlay = Vec::new();

    for annotation in annotations {
        let Some(highlight) = annotation.highlight() else {
            continue;
        };
        if highlight.page != page {
            continue;
        }
        for rect in merge_rects(&highlight.rects) {
            overlay.push(OverlayRect {
                rect,
                kind: OverlayKind::Persisted(annotation.id),
            });
        }
    }

    if let Some(highlight) = pending.filter(|h| h.page == page) {
        for rect in &highlight.rects {
            overlay.push(OverlayRect {
                rect: *rect,
                kind: OverlayKind::Pending,
            });
        }
    }

    if let Some(live) = selection.filter(|s| s.page == page) {
        for rect in &live.rects {
            overlay.push(OverlayRect {
                rect: *rect,
                kind: OverlayKind::Pending,
            });
        }
    }

    overlay
}

/// Report the annotation under a page-relative point, if any. Rects
/// painted later sit on top, so the scan runs back to front. Pending
/// rects are transparent to hits.
pub fn hit_test(overlay: &[OverlayRect], x_percent: f64, y_percent: f64) -> Option<AnnotationId> {
    overlay
        .iter()
        .rev()
        .filter(|o| o.rect.contains(x_percent, y_percent))
        .find_map(|o| o.annotation_id())
}

/// Locate the first rendered rectangle for an annotation, for
/// scroll-into-view plus pulse.
///
/// Returns `None` when the annotation is unknown, has no highlight, or
/// its page has not been rasterized yet; that is a no-op for the caller,
/// not an error. Calling again while the target is already visible
/// produces the target again, so the pulse re-fires.
pub fn scroll_target<F>(
    annotations: &[Annotation],
    id: AnnotationId,
    is_page_rendered: F,
) -> Option<ScrollTarget>
where
    F: Fn(PageIndex) -> bool,
{
    let annotation = annotations.iter().find(|a| a.id == id)?;
    let highlight = annotation.highlight()?;
    if !is_page_rendered(highlight.page) {
        return None;
    }

    merge_rects(&highlight.rects)
        .first()
        .map(|rect| ScrollTarget {
            annotation: id,
            page: highlight.page,
            rect: *rect,
        })
}
