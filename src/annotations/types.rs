//! Annotation types
//!
//! The durable shape of a page-anchored comment: which page it is filed
//! under, who wrote it, and (optionally) the normalized highlight anchor
//! reconstructing where on the page it visually sits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// 1-based page number as surfaced by the rasterizer.
pub type PageIndex = u32;

/// Store-assigned identity. Never generated locally; the external store
/// owns it (an issue id in the GitHub-backed store).
pub type AnnotationId = i64;

/// The durable, persisted form of a text selection: the owning page, the
/// raw selected string, and the merged page-relative rectangles.
///
/// Immutable once created. Rects are stored as captured; the overlay
/// re-merges them on every render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub page: PageIndex,
    pub text: String,
    pub rects: Vec<Rect>,
}

/// Metadata embedded in the machine-readable marker of a stored entry.
///
/// `highlight` is omitted from the wire format entirely when the
/// annotation is page-scoped only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMeta {
    pub page: PageIndex,
    pub author: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
}

impl AnnotationMeta {
    /// Page-scoped metadata with no visual anchor.
    pub fn page_scoped(page: PageIndex, author: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            page,
            author: author.to_string(),
            created_at,
            highlight: None,
        }
    }

    /// Metadata anchored to a highlight. The annotation is filed under
    /// the highlight's page; a highlight cannot anchor to a page other
    /// than the one its annotation is filed under.
    pub fn anchored(author: &str, created_at: DateTime<Utc>, highlight: Highlight) -> Self {
        Self {
            page: highlight.page,
            author: author.to_string(),
            created_at,
            highlight: Some(highlight),
        }
    }

    /// Author name with the anonymous fallback applied.
    pub fn display_author(&self) -> &str {
        if self.author.trim().is_empty() {
            "Anonymous"
        } else {
            &self.author
        }
    }
}

/// A decoded annotation as read back from the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Opaque identity assigned by the store.
    pub id: AnnotationId,
    pub meta: AnnotationMeta,
    /// Human-readable comment text, exactly as the author wrote it.
    pub body: String,
    /// Link back to the store entry this was decoded from.
    pub origin_url: String,
}

impl Annotation {
    /// The highlight anchor, if this annotation is region-scoped.
    pub fn highlight(&self) -> Option<&Highlight> {
        self.meta.highlight.as_ref()
    }

    pub fn page(&self) -> PageIndex {
        self.meta.page
    }
}
