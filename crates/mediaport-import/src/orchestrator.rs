//! Import orchestration
//!
//! Sequences one job's import: albums first (so every item can resolve
//! its destination album id), then item batches per album grouping.
//! Identity resolution always precedes any upload.

use crate::albums::AlbumImporter;
use crate::config::ImportConfig;
use crate::destination::DestinationApi;
use crate::error::Result;
use crate::executor::InMemoryIdempotentExecutor;
use crate::fetch::RemoteFetcher;
use crate::models::{AuthData, ImportSummary, JobId, MediaCollection, MediaItem};
use crate::stager::ContentStager;
use crate::store::{JobByteStore, JobMetadataStore};
use crate::uploader::ItemUploader;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Orchestrates a full collection import for one job
pub struct ImportOrchestrator<D: DestinationApi> {
    albums: AlbumImporter<D>,
    uploader: ItemUploader<D>,
}

impl<D: DestinationApi> ImportOrchestrator<D> {
    pub fn new(
        destination: Arc<D>,
        fetcher: Arc<dyn RemoteFetcher>,
        byte_store: Arc<dyn JobByteStore>,
        job_store: Arc<dyn JobMetadataStore>,
        config: ImportConfig,
    ) -> Result<Self> {
        config.validate()?;

        let stager = ContentStager::new(fetcher, byte_store);
        Ok(Self {
            albums: AlbumImporter::new(destination.clone(), job_store),
            uploader: ItemUploader::new(destination, stager, config),
        })
    }

    /// Import a collection with a caller-supplied executor
    ///
    /// The executor carries this job's key → identity cache and error
    /// set; passing the same executor across repeated invocations makes
    /// re-runs skip everything that already succeeded.
    pub async fn import_collection(
        &self,
        job_id: JobId,
        auth: &AuthData,
        executor: &InMemoryIdempotentExecutor,
        collection: &MediaCollection,
    ) -> Result<ImportSummary> {
        let started_at = Utc::now();
        info!(
            job_id = %job_id,
            albums = collection.albums.len(),
            items = collection.items.len(),
            "Starting collection import"
        );

        let mut albums_imported = 0usize;
        for album in &collection.albums {
            match self.albums.import_album(job_id, auth, executor, album).await {
                Ok(_) => albums_imported += 1,
                Err(err) => {
                    // Recorded in the executor's error set; the album's
                    // items are skipped below and stay eligible for retry.
                    warn!(
                        job_id = %job_id,
                        old_album_id = %album.old_id,
                        error = %err,
                        "Album import failed"
                    );
                },
            }
        }

        let mut imported_bytes = 0u64;
        for (old_album_id, group) in group_by_album(&collection.items) {
            let new_album_id = match &old_album_id {
                Some(old_id) => match executor.get_cached::<String>(old_id).await {
                    Some(new_id) => Some(new_id),
                    None => {
                        warn!(
                            job_id = %job_id,
                            old_album_id = %old_id,
                            item_count = group.len(),
                            "Skipping items of unresolved album"
                        );
                        continue;
                    },
                },
                None => None,
            };

            imported_bytes += self
                .uploader
                .import_items(job_id, auth, executor, new_album_id.as_deref(), &group)
                .await?;
        }

        let mut items_imported = 0usize;
        for item in &collection.items {
            if executor.is_key_cached(&item.idempotent_id()).await {
                items_imported += 1;
            }
        }

        let errors = executor.get_errors().await;
        let summary = ImportSummary {
            imported_bytes,
            items_imported,
            albums_imported,
            errors,
            started_at,
            completed_at: Utc::now(),
        };

        info!(
            job_id = %job_id,
            imported_bytes = summary.imported_bytes,
            items_imported = summary.items_imported,
            albums_imported = summary.albums_imported,
            error_count = summary.errors.len(),
            "Collection import completed"
        );
        Ok(summary)
    }

    /// Import a collection with a fresh executor for this job run
    pub async fn run(
        &self,
        job_id: JobId,
        auth: &AuthData,
        collection: &MediaCollection,
    ) -> Result<ImportSummary> {
        let executor = InMemoryIdempotentExecutor::new();
        self.import_collection(job_id, auth, &executor, collection)
            .await
    }
}

/// Group items by their old album id, preserving first-seen album order
/// and input order within each group
fn group_by_album(items: &[MediaItem]) -> Vec<(Option<String>, Vec<MediaItem>)> {
    let mut groups: Vec<(Option<String>, Vec<MediaItem>)> = Vec::new();

    for item in items {
        match groups.iter_mut().find(|(key, _)| *key == item.old_album_id) {
            Some((_, group)) => group.push(item.clone()),
            None => groups.push((item.old_album_id.clone(), vec![item.clone()])),
        }
    }

    groups
}
