//! Content staging
//!
//! Resolves the byte payload for an item from one of two sources: a
//! streaming remote fetch, or a blob previously staged into the
//! job-scoped byte store by the export side.

use crate::error::Result;
use crate::fetch::RemoteFetcher;
use crate::models::{JobId, MediaItem};
use crate::store::{JobByteStore, ResolvedContent};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves and cleans up item content
pub struct ContentStager {
    fetcher: Arc<dyn RemoteFetcher>,
    byte_store: Arc<dyn JobByteStore>,
}

impl ContentStager {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, byte_store: Arc<dyn JobByteStore>) -> Self {
        Self { fetcher, byte_store }
    }

    /// Resolve the item's content stream and declared length
    pub async fn resolve(&self, job_id: JobId, item: &MediaItem) -> Result<ResolvedContent> {
        if item.in_temp_store {
            debug!(job_id = %job_id, item_id = %item.old_id, "Reading staged blob");
            self.byte_store.get_stream(job_id, &item.old_id).await
        } else {
            debug!(item_id = %item.old_id, url = %item.fetchable_url, "Fetching remote content");
            self.fetcher.fetch(&item.fetchable_url).await
        }
    }

    /// Remove the item's staged blob after its upload was acknowledged
    ///
    /// Must not be called before the upload is confirmed: a blob deleted
    /// early is unrecoverable on retry. No-op for non-staged items;
    /// deletion failures are logged and swallowed (the blob is re-deleted
    /// or garbage-collected by a later run).
    pub async fn cleanup(&self, job_id: JobId, item: &MediaItem) {
        if !item.in_temp_store {
            return;
        }

        match self.byte_store.remove_data(job_id, &item.old_id).await {
            Ok(()) => {
                debug!(job_id = %job_id, item_id = %item.old_id, "Removed staged blob");
            },
            Err(err) => {
                warn!(
                    job_id = %job_id,
                    item_id = %item.old_id,
                    error = %err,
                    "Failed to remove staged blob"
                );
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use crate::store::InMemoryJobStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RemoteFetcher for CountingFetcher {
        async fn fetch(&self, _url: &str) -> Result<ResolvedContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ResolvedContent::from_bytes(vec![0u8; 32]))
        }
    }

    fn item(in_temp_store: bool) -> MediaItem {
        MediaItem {
            title: "Model photo title".to_string(),
            description: None,
            media_type: "image/jpeg".to_string(),
            fetchable_url: "https://source.example/photo.jpg".to_string(),
            old_id: "photo1".to_string(),
            old_album_id: Some("album1".to_string()),
            in_temp_store,
            content_hash: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_immediate_uses_fetcher() {
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
        });
        let stager = ContentStager::new(fetcher.clone(), Arc::new(InMemoryJobStore::new()));

        let content = stager.resolve(Uuid::new_v4(), &item(false)).await.unwrap();
        assert_eq!(content.length, 32);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_deferred_reads_staged_blob() {
        let store = Arc::new(InMemoryJobStore::new());
        let job_id = Uuid::new_v4();
        store.put_data(job_id, "photo1", b"TestingBytes".to_vec()).await;

        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
        });
        let stager = ContentStager::new(fetcher.clone(), store.clone());

        let content = stager.resolve(job_id, &item(true)).await.unwrap();
        assert_eq!(content.length, 12);
        // The fetcher is never consulted for staged items
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_deferred_missing_blob_is_an_error() {
        let stager = ContentStager::new(
            Arc::new(CountingFetcher {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(InMemoryJobStore::new()),
        );

        let err = stager.resolve(Uuid::new_v4(), &item(true)).await.unwrap_err();
        assert!(matches!(err, ImportError::TempStore(_)));
    }

    #[tokio::test]
    async fn test_cleanup_removes_staged_blob_once() {
        let store = Arc::new(InMemoryJobStore::new());
        let job_id = Uuid::new_v4();
        store.put_data(job_id, "photo1", b"TestingBytes".to_vec()).await;

        let stager = ContentStager::new(
            Arc::new(CountingFetcher {
                calls: AtomicUsize::new(0),
            }),
            store.clone(),
        );

        stager.cleanup(job_id, &item(true)).await;
        assert!(!store.has_data(job_id, "photo1").await);

        // A second cleanup of the same blob is swallowed
        stager.cleanup(job_id, &item(true)).await;
    }

    #[tokio::test]
    async fn test_cleanup_ignores_unstaged_items() {
        let store = Arc::new(InMemoryJobStore::new());
        let job_id = Uuid::new_v4();
        store.put_data(job_id, "photo1", b"TestingBytes".to_vec()).await;

        let stager = ContentStager::new(
            Arc::new(CountingFetcher {
                calls: AtomicUsize::new(0),
            }),
            store.clone(),
        );

        stager.cleanup(job_id, &item(false)).await;
        // Blob untouched for a non-staged item sharing the same id
        assert!(store.has_data(job_id, "photo1").await);
    }
}
