//! Rectangle types for the two coordinate spaces the engine moves between:
//! raw device pixels (what the rendering surface reports) and page-relative
//! percentages (what gets persisted).

use serde::{Deserialize, Serialize};

/// Rectangle in page-relative percentages (0-100 of the owning page's
/// rendered width/height).
///
/// The same `Rect` maps to the same visual region at any zoom level or
/// device pixel ratio, because the percentages were computed against the
/// page's own bounding box at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Whether a point lies within this rectangle (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Union bounding box of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// Rectangle in device pixels, as reported by the rendering surface for a
/// selection fragment or a page bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether this rectangle has no overlap with `bounds` at all.
    pub fn is_disjoint(&self, bounds: &PixelRect) -> bool {
        self.right() <= bounds.left
            || self.left >= bounds.right()
            || self.bottom() <= bounds.top
            || self.top >= bounds.bottom()
    }

    /// Intersection with `bounds`, or `None` when disjoint.
    ///
    /// A fragment fully outside the page is excluded rather than clamped
    /// to a zero-size rectangle.
    pub fn clamp_to(&self, bounds: &PixelRect) -> Option<PixelRect> {
        if self.is_disjoint(bounds) {
            return None;
        }
        let left = self.left.max(bounds.left);
        let top = self.top.max(bounds.top);
        let right = self.right().min(bounds.right());
        let bottom = self.bottom().min(bounds.bottom());
        Some(PixelRect {
            left,
            top,
            width: right - left,
            height: bottom - top,
        })
    }

    /// Convert to page-relative percentages against the page's bounding
    /// box in the same device-pixel space.
    pub fn to_page_percent(&self, page: &PixelRect) -> Rect {
        Rect {
            x: (self.left - page.left) / page.width * 100.0,
            y: (self.top - page.top) / page.height * 100.0,
            width: self.width / page.width * 100.0,
            height: self.height / page.height * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_straddling_fragment() {
        let page = PixelRect::new(100.0, 100.0, 800.0, 1000.0);
        let fragment = PixelRect::new(50.0, 1050.0, 200.0, 100.0);

        let clamped = fragment.clamp_to(&page).unwrap();
        assert_eq!(clamped.left, 100.0);
        assert_eq!(clamped.top, 1050.0);
        assert_eq!(clamped.width, 150.0);
        assert_eq!(clamped.height, 50.0);
    }

    #[test]
    fn test_fully_outside_fragment_is_excluded() {
        let page = PixelRect::new(100.0, 100.0, 800.0, 1000.0);
        let below = PixelRect::new(200.0, 1200.0, 50.0, 20.0);
        let left_of = PixelRect::new(0.0, 200.0, 50.0, 20.0);

        assert!(below.clamp_to(&page).is_none());
        assert!(left_of.clamp_to(&page).is_none());
    }

    #[test]
    fn test_touching_edge_counts_as_disjoint() {
        let page = PixelRect::new(0.0, 0.0, 100.0, 100.0);
        let touching = PixelRect::new(100.0, 0.0, 50.0, 50.0);

        assert!(touching.is_disjoint(&page));
        assert!(touching.clamp_to(&page).is_none());
    }

    #[test]
    fn test_to_page_percent() {
        let page = PixelRect::new(100.0, 200.0, 800.0, 1000.0);
        let fragment = PixelRect::new(300.0, 450.0, 400.0, 100.0);

        let rect = fragment.to_page_percent(&page);
        assert!((rect.x - 25.0).abs() < f64::EPSILON);
        assert!((rect.y - 25.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_is_scale_invariant() {
        let page_1x = PixelRect::new(0.0, 0.0, 800.0, 1000.0);
        let page_2x = PixelRect::new(0.0, 0.0, 1600.0, 2000.0);
        let frag_1x = PixelRect::new(80.0, 100.0, 160.0, 50.0);
        let frag_2x = PixelRect::new(160.0, 200.0, 320.0, 100.0);

        let a = frag_1x.to_page_percent(&page_1x);
        let b = frag_2x.to_page_percent(&page_2x);
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
        assert!((a.width - b.width).abs() < 1e-9);
        assert!((a.height - b.height).abs() < 1e-9);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 30.0, 5.0);
        assert!(rect.contains(25.0, 22.0));
        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(40.0, 25.0));
        assert!(!rect.contains(41.0, 22.0));
        assert!(!rect.contains(25.0, 26.0));
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(10.0, 10.0, 10.0, 5.0);
        let b = Rect::new(15.0, 12.0, 20.0, 5.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(10.0, 10.0, 25.0, 7.0));
    }
}
