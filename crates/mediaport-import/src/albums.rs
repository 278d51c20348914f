//! Album import
//!
//! Creates destination albums at most once per source album key and
//! remaps old album identities to the new remote ids.

use crate::destination::{DestinationApi, NewAlbum};
use crate::error::Result;
use crate::executor::InMemoryIdempotentExecutor;
use crate::models::{AuthData, JobId, MediaAlbum};
use crate::store::JobMetadataStore;
use crate::strings;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Imports source albums into the destination
pub struct AlbumImporter<D: DestinationApi> {
    destination: Arc<D>,
    job_store: Arc<dyn JobMetadataStore>,
    /// Localized copy-of template per job, filled on first use so the job
    /// metadata store is consulted at most once per job
    copy_templates: Mutex<HashMap<JobId, String>>,
}

impl<D: DestinationApi> AlbumImporter<D> {
    pub fn new(destination: Arc<D>, job_store: Arc<dyn JobMetadataStore>) -> Self {
        Self {
            destination,
            job_store,
            copy_templates: Mutex::new(HashMap::new()),
        }
    }

    /// Create the album on the destination, at most once per source key
    ///
    /// Returns the new remote album id. Repeat calls for the same source
    /// album (within one job run) return the cached id without another
    /// remote call, so every item in the album resolves the same identity.
    pub async fn import_album(
        &self,
        job_id: JobId,
        auth: &AuthData,
        executor: &InMemoryIdempotentExecutor,
        album: &MediaAlbum,
    ) -> Result<String> {
        let key = album.idempotent_id();

        executor
            .execute_or_throw(&key, &album.name, || async move {
                let template = self.copy_template(job_id).await?;
                let new_album = NewAlbum {
                    title: strings::apply_template(&template, &album.name),
                    description: album.description.clone(),
                };

                let remote = self.destination.create_album(auth, &new_album).await?;
                info!(
                    job_id = %job_id,
                    old_album_id = %album.old_id,
                    new_album_id = %remote.id,
                    "Created destination album"
                );
                Ok(remote.id)
            })
            .await
    }

    /// Localized copy-of template for the job, fetched at most once
    async fn copy_template(&self, job_id: JobId) -> Result<String> {
        let mut templates = self.copy_templates.lock().await;
        if let Some(template) = templates.get(&job_id) {
            return Ok(template.clone());
        }

        let locale = self
            .job_store
            .find_job(job_id)
            .await?
            .and_then(|job| job.user_locale)
            .unwrap_or_else(|| "en".to_string());

        let template = strings::copy_of_template(&locale).to_string();
        debug!(job_id = %job_id, locale = %locale, "Resolved album copy template");
        templates.insert(job_id, template.clone());
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{
        BatchCreateResponse, DestinationError, NewMediaItem, RemoteAlbum, UploadToken,
    };
    use crate::store::{InMemoryJobStore, JobMetadata, ResolvedContent};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingDestination {
        created: Mutex<Vec<NewAlbum>>,
        create_calls: AtomicUsize,
    }

    #[async_trait]
    impl DestinationApi for RecordingDestination {
        async fn create_album(
            &self,
            _auth: &AuthData,
            album: &NewAlbum,
        ) -> std::result::Result<RemoteAlbum, DestinationError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.created.lock().await.push(album.clone());
            Ok(RemoteAlbum {
                id: "NEW_ALBUM_ID".to_string(),
                title: album.title.clone(),
            })
        }

        async fn upload_content(
            &self,
            _auth: &AuthData,
            _content: ResolvedContent,
            _expected_hash: Option<&str>,
        ) -> std::result::Result<UploadToken, DestinationError> {
            unimplemented!("not used by album tests")
        }

        async fn create_items_batch(
            &self,
            _auth: &AuthData,
            _album_id: Option<&str>,
            _items: Vec<NewMediaItem>,
        ) -> std::result::Result<BatchCreateResponse, DestinationError> {
            unimplemented!("not used by album tests")
        }

        async fn get_album(
            &self,
            _auth: &AuthData,
            _album_id: &str,
        ) -> std::result::Result<RemoteAlbum, DestinationError> {
            unimplemented!("not used by album tests")
        }
    }

    struct CountingJobStore {
        inner: InMemoryJobStore,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl JobMetadataStore for CountingJobStore {
        async fn find_job(&self, job_id: JobId) -> Result<Option<JobMetadata>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_job(job_id).await
        }
    }

    fn album() -> MediaAlbum {
        MediaAlbum {
            old_id: "OLD_ALBUM_ID".to_string(),
            name: "Album Name".to_string(),
            description: Some("Album description".to_string()),
        }
    }

    #[tokio::test]
    async fn test_import_album_creates_once_per_key() {
        let destination = Arc::new(RecordingDestination::default());
        let importer = AlbumImporter::new(destination.clone(), Arc::new(InMemoryJobStore::new()));
        let executor = InMemoryIdempotentExecutor::new();
        let auth = AuthData::new("token");
        let job_id = Uuid::new_v4();

        let first = importer
            .import_album(job_id, &auth, &executor, &album())
            .await
            .unwrap();
        let second = importer
            .import_album(job_id, &auth, &executor, &album())
            .await
            .unwrap();

        assert_eq!(first, "NEW_ALBUM_ID");
        assert_eq!(second, "NEW_ALBUM_ID");
        assert_eq!(destination.create_calls.load(Ordering::SeqCst), 1);
        assert!(executor.is_key_cached("OLD_ALBUM_ID").await);
    }

    #[tokio::test]
    async fn test_album_title_uses_job_locale() {
        let store = Arc::new(InMemoryJobStore::new());
        let job_id = Uuid::new_v4();
        store
            .put_job(
                job_id,
                JobMetadata {
                    user_locale: Some("it".to_string()),
                },
            )
            .await;

        let destination = Arc::new(RecordingDestination::default());
        let importer = AlbumImporter::new(destination.clone(), store);
        let executor = InMemoryIdempotentExecutor::new();

        importer
            .import_album(job_id, &AuthData::new("token"), &executor, &album())
            .await
            .unwrap();

        let created = destination.created.lock().await;
        assert_eq!(created[0].title, "Copia di Album Name");
        assert_eq!(created[0].description.as_deref(), Some("Album description"));
    }

    #[tokio::test]
    async fn test_metadata_lookup_happens_at_most_once_per_job() {
        let store = Arc::new(CountingJobStore {
            inner: InMemoryJobStore::new(),
            lookups: AtomicUsize::new(0),
        });
        let destination = Arc::new(RecordingDestination::default());
        let importer = AlbumImporter::new(destination, store.clone());
        let executor = InMemoryIdempotentExecutor::new();
        let auth = AuthData::new("token");
        let job_id = Uuid::new_v4();

        let second_album = MediaAlbum {
            old_id: "OLD_ALBUM_ID_2".to_string(),
            name: "Second Album".to_string(),
            description: None,
        };

        importer
            .import_album(job_id, &auth, &executor, &album())
            .await
            .unwrap();
        importer
            .import_album(job_id, &auth, &executor, &second_album)
            .await
            .unwrap();

        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_job_falls_back_to_english() {
        let destination = Arc::new(RecordingDestination::default());
        let importer = AlbumImporter::new(destination.clone(), Arc::new(InMemoryJobStore::new()));
        let executor = InMemoryIdempotentExecutor::new();

        importer
            .import_album(Uuid::new_v4(), &AuthData::new("token"), &executor, &album())
            .await
            .unwrap();

        let created = destination.created.lock().await;
        assert_eq!(created[0].title, "Copy of Album Name");
    }
}
