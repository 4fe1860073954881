//! Annotation store boundary
//!
//! The external store is an issue tracker repurposed as an append-only
//! list of free-text entries. The engine treats it strictly as pluggable
//! storage behind a `list`/`create` interface; swapping in a real
//! database means implementing [`AnnotationStore`] and nothing else.

mod issues;

use async_trait::async_trait;
use thiserror::Error;

pub use issues::IssueStore;

/// One raw entry as the store holds it. The body may or may not carry
/// the annotation marker; filtering is the caller's job, not the store's.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEntry {
    /// Store-assigned identity.
    pub id: i64,
    /// Free-text body.
    pub body: String,
    /// Human-viewable URL for the entry.
    pub url: String,
}

/// Store operation failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No write credential is configured. This is a permanent, known
    /// condition: callers should disable creation, not offer a retry.
    #[error("store is read-only: no write token configured")]
    ReadOnly,

    /// The store rejected the request (authorization, rate limit,
    /// validation). Surfaced with the store's own message; no automatic
    /// retry.
    #[error("store request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection-level failure.
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl StoreError {
    /// Whether this is the permanent read-only condition, as opposed to
    /// a transient failure worth surfacing with a retry affordance.
    pub fn is_read_only(&self) -> bool {
        matches!(self, StoreError::ReadOnly)
    }
}

/// Asynchronous list/create interface over the external store.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Whether the store lacks a write credential. Permanent for the
    /// lifetime of the store instance.
    fn read_only(&self) -> bool;

    /// List entries, optionally narrowed to one page's label. Entries
    /// that are not annotations are included; the caller filters.
    async fn list(&self, page_label: Option<&str>) -> Result<Vec<StoreEntry>, StoreError>;

    /// Append a new entry. Fails with [`StoreError::ReadOnly`] when no
    /// write credential is configured.
    async fn create(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<StoreEntry, StoreError>;
}
