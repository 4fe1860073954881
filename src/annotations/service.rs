//! Store-backed annotation service
//!
//! Bridges the codec and the store: listing decodes every entry and
//! silently drops the ones that are not ours; creation encodes, writes,
//! and decodes the stored entry back so the caller sees exactly what a
//! later reload will see.

use thiserror::Error;

use crate::store::{AnnotationStore, StoreError};

use super::codec;
use super::types::{Annotation, PageIndex};
use super::AnnotationMeta;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store accepted the entry but handed back a body the codec
    /// cannot read. Should not happen with a well-behaved store.
    #[error("created entry could not be decoded back")]
    CreatedEntryInvalid,
}

impl AnnotationError {
    /// Whether creation is permanently unavailable (read-only store),
    /// as opposed to a transient failure.
    pub fn is_read_only(&self) -> bool {
        matches!(self, AnnotationError::Store(err) if err.is_read_only())
    }
}

/// High-level annotation operations over any [`AnnotationStore`].
pub struct AnnotationService<S> {
    store: S,
}

impl<S: AnnotationStore> AnnotationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether creation is disabled for lack of a write credential.
    pub fn read_only(&self) -> bool {
        self.store.read_only()
    }

    /// Fetch and decode every annotation. Entries without the marker or
    /// with a malformed payload are foreign and dropped without comment.
    pub async fn fetch_all(&self) -> Result<Vec<Annotation>, AnnotationError> {
        let entries = self.store.list(None).await?;
        Ok(entries.into_iter().filter_map(decode_entry).collect())
    }

    /// Fetch annotations narrowed to one page's label.
    pub async fn fetch_page(&self, page: PageIndex) -> Result<Vec<Annotation>, AnnotationError> {
        let label = codec::page_label(page);
        let entries = self.store.list(Some(&label)).await?;
        Ok(entries.into_iter().filter_map(decode_entry).collect())
    }

    /// Encode and persist a new annotation.
    ///
    /// With no write credential this fails with the permanent read-only
    /// condition before the store's create operation is ever invoked.
    pub async fn create(
        &self,
        meta: &AnnotationMeta,
        body: &str,
    ) -> Result<Annotation, AnnotationError> {
        if self.store.read_only() {
            return Err(StoreError::ReadOnly.into());
        }

        let encoded = codec::encode(meta, body);
        let entry = self
            .store
            .create(&encoded.title, &encoded.body, &encoded.labels)
            .await?;

        let (meta_back, body_back) =
            codec::decode(&entry.body).ok_or(AnnotationError::CreatedEntryInvalid)?;

        tracing::info!(id = entry.id, page = meta_back.page, "annotation created");
        Ok(Annotation {
            id: entry.id,
            meta: meta_back,
            body: body_back,
            origin_url: entry.url,
        })
    }
}

fn decode_entry(entry: crate::store::StoreEntry) -> Option<Annotation> {
    let (meta, body) = codec::decode(&entry.body)?;
    Some(Annotation {
        id: entry.id,
        meta,
        body,
        origin_url: entry.url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreEntry;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ts() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().unwrap()
    }

    /// In-memory store; counts create calls so tests can assert the
    /// write path was never reached.
    struct MockStore {
        entries: Vec<StoreEntry>,
        read_only: bool,
        create_calls: AtomicUsize,
        fail_list: bool,
    }

    impl MockStore {
        fn with_entries(entries: Vec<StoreEntry>) -> Self {
            Self {
                entries,
                read_only: false,
                create_calls: AtomicUsize::new(0),
                fail_list: false,
            }
        }
    }

    #[async_trait]
    impl AnnotationStore for MockStore {
        fn read_only(&self) -> bool {
            self.read_only
        }

        async fn list(&self, _page_label: Option<&str>) -> Result<Vec<StoreEntry>, StoreError> {
            if self.fail_list {
                return Err(StoreError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(self.entries.clone())
        }

        async fn create(
            &self,
            _title: &str,
            body: &str,
            _labels: &[String],
        ) -> Result<StoreEntry, StoreError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            Ok(StoreEntry {
                id: 500,
                body: body.to_string(),
                url: "https://example.test/issues/500".to_string(),
            })
        }
    }

    fn stored_entry(id: i64, page: PageIndex, body: &str) -> StoreEntry {
        let meta = AnnotationMeta::page_scoped(page, "ada", ts());
        StoreEntry {
            id,
            body: codec::encode(&meta, body).body,
            url: format!("https://example.test/issues/{id}"),
        }
    }

    #[tokio::test]
    async fn test_foreign_entries_are_filtered_siblings_kept() {
        let store = MockStore::with_entries(vec![
            StoreEntry {
                id: 1,
                body: "no marker here".to_string(),
                url: "https://example.test/issues/1".to_string(),
            },
            stored_entry(2, 4, "a real annotation"),
        ]);
        let service = AnnotationService::new(store);

        let annotations = service.fetch_all().await.unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].id, 2);
        assert_eq!(annotations[0].body, "a real annotation");
    }

    #[tokio::test]
    async fn test_read_only_create_never_reaches_store() {
        let store = MockStore {
            read_only: true,
            ..MockStore::with_entries(vec![])
        };
        let service = AnnotationService::new(store);
        let meta = AnnotationMeta::page_scoped(1, "ada", ts());

        let err = service.create(&meta, "draft text").await.unwrap_err();
        assert!(err.is_read_only());
        assert_eq!(service.store.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_round_trips_through_store() {
        let service = AnnotationService::new(MockStore::with_entries(vec![]));
        let meta = AnnotationMeta::page_scoped(6, "ada", ts());

        let created = service.create(&meta, "fresh comment").await.unwrap();
        assert_eq!(created.id, 500);
        assert_eq!(created.meta, meta);
        assert_eq!(created.body, "fresh comment");
        assert_eq!(service.store.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_failure_is_surfaced() {
        let store = MockStore {
            fail_list: true,
            ..MockStore::with_entries(vec![])
        };
        let service = AnnotationService::new(store);

        let err = service.fetch_all().await.unwrap_err();
        assert!(!err.is_read_only());
        assert!(err.to_string().contains("503"));
    }
}
