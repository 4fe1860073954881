//! Stored-body codec
//!
//! Annotations ride inside free-text store entries. The metadata travels
//! in an HTML-comment marker ahead of the human-readable body, so an
//! entry stays legible in the store's own UI while remaining machine
//! parseable. Entries without the marker belong to someone else and are
//! skipped, never treated as errors.

use serde::{Deserialize, Serialize};

use super::types::{AnnotationMeta, PageIndex};

/// Canonical marker key. The `papersharer:` variant that briefly existed
/// is deliberately not decoded.
const MARKER_KEY: &str = "papershare:";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const FOOTER_RULE: &str = "---";
const FOOTER_TEXT: &str = "*Posted via PaperShare*";

/// Fixed category label carried by every entry we create.
pub const CATEGORY_LABEL: &str = "papershare";

const TITLE_MAX_CHARS: usize = 80;

/// Page-scoped label, e.g. `page:3`.
pub fn page_label(page: PageIndex) -> String {
    format!("page:{page}")
}

/// What `encode` hands to the store: a derived title, the marker-bearing
/// body, and the labels the entry is filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedAnnotation {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Serialize metadata and body into the stored representation.
///
/// The body is embedded verbatim; callers pass it already trimmed (the
/// round trip recovers the trimmed form).
pub fn encode(meta: &AnnotationMeta, body: &str) -> EncodedAnnotation {
    let meta_json = serde_json::to_string(meta)
        .expect("annotation metadata serializes infallibly");

    let title = format!("[Page {}] {}", meta.page, truncate_title(body));
    let stored = format!(
        "{COMMENT_OPEN} {MARKER_KEY}{meta_json} {COMMENT_CLOSE}\n\n{body}\n\n{FOOTER_RULE}\n{FOOTER_TEXT}"
    );

    EncodedAnnotation {
        title,
        body: stored,
        labels: vec![CATEGORY_LABEL.to_string(), page_label(meta.page)],
    }
}

/// Parse a stored body back into metadata and the original comment text.
///
/// Returns `None` when the marker is absent or its JSON payload is
/// malformed; the entry is simply not one of ours.
pub fn decode(stored: &str) -> Option<(AnnotationMeta, String)> {
    let (meta, span) = find_marker(stored)?;

    let mut remaining = String::with_capacity(stored.len());
    remaining.push_str(&stored[..span.0]);
    remaining.push_str(&stored[span.1..]);

    let body = strip_footer(remaining.trim()).trim().to_string();
    Some((meta, body))
}

/// Locate the first HTML comment carrying the marker key and parse its
/// JSON payload. Returns the metadata and the comment's byte span.
fn find_marker(stored: &str) -> Option<(AnnotationMeta, (usize, usize))> {
    for (open_idx, _) in stored.match_indices(COMMENT_OPEN) {
        let inner_start = open_idx + COMMENT_OPEN.len();
        let inner = &stored[inner_start..];
        let keyed = inner.trim_start();
        let Some(payload) = keyed.strip_prefix(MARKER_KEY) else {
            continue;
        };
        let Some(close_rel) = payload.find(COMMENT_CLOSE) else {
            continue;
        };
        let json = payload[..close_rel].trim();
        let meta: AnnotationMeta = serde_json::from_str(json).ok()?;

        let payload_start = inner_start + (inner.len() - payload.len());
        let span_end = payload_start + close_rel + COMMENT_CLOSE.len();
        return Some((meta, (open_idx, span_end)));
    }
    None
}

/// Remove the trailing `---` / footer pair, if present in full.
fn strip_footer(body: &str) -> &str {
    let trimmed = body.trim_end();
    if let Some(without_text) = trimmed.strip_suffix(FOOTER_TEXT) {
        if let Some(without_rule) = without_text.trim_end().strip_suffix(FOOTER_RULE) {
            return without_rule;
        }
    }
    body
}

fn truncate_title(body: &str) -> String {
    let count = body.chars().count();
    if count > TITLE_MAX_CHARS {
        let head: String = body.chars().take(TITLE_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
