//! Line-box merging for fragmented selection rectangles.
//!
//! A single logical text selection can span dozens of disjoint client
//! rectangles (one or more per visual line, per kerning break). This
//! collapses them to one bounding rectangle per visual line so that a
//! freshly captured selection and a reloaded anchor paint identically.

use super::Rect;

/// Merge fragmented rects into one rect per visual line.
///
/// Sorts by `(y, x)`, then folds vertically-overlapping neighbors into
/// union bounding boxes. Output is ordered by ascending vertical position.
///
/// This is a greedy line-clustering pass, not a general rectangle union:
/// it assumes the fragments come from single-column text selection and
/// will over-merge Y-overlapping fragments from distinct columns.
pub fn merge_rects(rects: &[Rect]) -> Vec<Rect> {
    if rects.is_empty() {
        return Vec::new();
    }

    let mut sorted = rects.to_vec();
    sorted.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut merged: Vec<Rect> = vec![sorted[0]];
    for curr in &sorted[1..] {
        let last = merged.len() - 1;
        if curr.y < merged[last].bottom() {
            // Same visual line: expand to the union bounding box
            merged[last] = merged[last].union(curr);
        } else {
            merged.push(*curr);
        }
    }

    merged
}
