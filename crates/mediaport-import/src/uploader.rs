//! Batched item upload and creation
//!
//! Stages content, uploads it for per-item tokens, then submits grouped
//! creation requests against the already-resolved destination album.
//! Per-item rejections are recorded without aborting siblings; systemic
//! batch failures are classified by error kind and either swallowed as a
//! zero-import outcome (unknown album) or re-raised to abort the job.

use crate::config::ImportConfig;
use crate::destination::{DestinationApi, DestinationError, NewMediaItem, UploadToken};
use crate::error::{ImportError, Result};
use crate::executor::InMemoryIdempotentExecutor;
use crate::models::{AuthData, JobId, MediaItem};
use crate::stager::ContentStager;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Base delay applied ahead of each batch-create call; multiplied by the
/// configured rate-limit factor.
const BATCH_CREATE_INTERVAL: Duration = Duration::from_millis(200);

/// An uploaded item waiting for its batch-create call
struct PendingUpload<'a> {
    item: &'a MediaItem,
    token: UploadToken,
    length: u64,
}

/// Uploads items and interprets batched creation outcomes
pub struct ItemUploader<D: DestinationApi> {
    destination: Arc<D>,
    stager: ContentStager,
    config: ImportConfig,
}

impl<D: DestinationApi> ItemUploader<D> {
    pub fn new(destination: Arc<D>, stager: ContentStager, config: ImportConfig) -> Self {
        Self {
            destination,
            stager,
            config,
        }
    }

    /// Import `items` into the destination album, returning the total
    /// byte length of the items created by this call
    ///
    /// Items whose key is already cached in the executor are skipped.
    /// Groups larger than the configured batch size are processed in
    /// consecutive chunks, each with its own batch-create call.
    pub async fn import_items(
        &self,
        job_id: JobId,
        auth: &AuthData,
        executor: &InMemoryIdempotentExecutor,
        album_id: Option<&str>,
        items: &[MediaItem],
    ) -> Result<u64> {
        let mut total_bytes = 0u64;

        for chunk in items.chunks(self.config.batch_size) {
            total_bytes += self
                .import_batch(job_id, auth, executor, album_id, chunk)
                .await?;
        }

        Ok(total_bytes)
    }

    async fn import_batch(
        &self,
        job_id: JobId,
        auth: &AuthData,
        executor: &InMemoryIdempotentExecutor,
        album_id: Option<&str>,
        items: &[MediaItem],
    ) -> Result<u64> {
        let mut pending: Vec<PendingUpload<'_>> = Vec::with_capacity(items.len());

        for item in items {
            let key = item.idempotent_id();
            if executor.is_key_cached(&key).await {
                debug!(key = %key, "Skipping already-imported item");
                continue;
            }

            let content = match self.stager.resolve(job_id, item).await {
                Ok(content) => content,
                Err(err) => {
                    executor
                        .execute_and_swallow::<String, _, _>(&key, &item.title, || async move {
                            Err(err)
                        })
                        .await;
                    continue;
                },
            };
            let length = content.length;

            match self
                .destination
                .upload_content(auth, content, item.content_hash.as_deref())
                .await
            {
                Ok(token) => {
                    // The upload is acknowledged; the staged blob is no
                    // longer the only copy and can go now rather than at
                    // batch completion.
                    self.stager.cleanup(job_id, item).await;
                    pending.push(PendingUpload {
                        item,
                        token,
                        length,
                    });
                },
                Err(DestinationError::Upload(message)) => {
                    // Content integrity failure (hash mismatch class).
                    // Recorded against the key either way; only re-raised
                    // while nothing has been collected for this batch, so
                    // an all-items-failed batch is distinguishable from a
                    // successful empty import.
                    let err = DestinationError::Upload(message.clone());
                    executor
                        .execute_and_swallow::<String, _, _>(&key, &item.title, || async move {
                            Err(ImportError::Destination(err))
                        })
                        .await;
                    if pending.is_empty() {
                        return Err(ImportError::Destination(DestinationError::Upload(message)));
                    }
                },
                Err(err) => {
                    // Per-item transport failure: record and keep going;
                    // the staged blob survives for a later retry.
                    executor
                        .execute_and_swallow::<String, _, _>(&key, &item.title, || async move {
                            Err(ImportError::Destination(err))
                        })
                        .await;
                },
            }
        }

        if pending.is_empty() {
            return Ok(0);
        }

        self.pace().await;

        let new_items: Vec<NewMediaItem> = pending
            .iter()
            .map(|upload| NewMediaItem {
                upload_token: upload.token.clone(),
                file_name: upload.item.title.clone(),
                description: upload.item.description.clone(),
            })
            .collect();

        let response = match self
            .destination
            .create_items_batch(auth, album_id, new_items)
            .await
        {
            Ok(response) => response,
            Err(DestinationError::AlbumNotFound(message)) => {
                // The album was removed or rejected independently of any
                // single item: a zero-import outcome for this batch, not a
                // job failure. Nothing is cached; a retry re-attempts.
                self.diagnose_missing_album(auth, album_id, &message).await;
                return Ok(0);
            },
            Err(err) => {
                warn!(job_id = %job_id, error = %err, "Batch creation failed");
                return Err(err.into());
            },
        };

        let mut batch_bytes = 0u64;
        for result in response.results {
            let Some(upload) = pending.iter().find(|p| p.token == result.upload_token) else {
                warn!(token = %result.upload_token, "Batch response token matches no upload");
                continue;
            };

            let key = upload.item.idempotent_id();
            if result.status.is_ok() {
                let new_id = result
                    .item
                    .map(|item| item.id)
                    .unwrap_or_else(|| result.upload_token.0.clone());
                executor
                    .execute_and_swallow(&key, &upload.item.title, || async move { Ok(new_id) })
                    .await;
                batch_bytes += upload.length;
            } else {
                let err = ImportError::ItemRejected {
                    id: key.clone(),
                    code: result.status.code,
                    message: result.status.message.clone().unwrap_or_default(),
                };
                executor
                    .execute_and_swallow::<String, _, _>(&key, &upload.item.title, || async move {
                        Err(err)
                    })
                    .await;
            }
        }

        info!(
            job_id = %job_id,
            album_id = ?album_id,
            batch_bytes,
            "Batch creation completed"
        );
        Ok(batch_bytes)
    }

    /// Delay ahead of a batch-create call, scaled by the rate-limit factor
    async fn pace(&self) {
        let delay = BATCH_CREATE_INTERVAL.mul_f64(self.config.rate_limit_factor);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn diagnose_missing_album(
        &self,
        auth: &AuthData,
        album_id: Option<&str>,
        message: &str,
    ) {
        let Some(album_id) = album_id else {
            warn!(error = %message, "Batch rejected without an album scope");
            return;
        };

        match self.destination.get_album(auth, album_id).await {
            Ok(album) => warn!(
                album_id = %album_id,
                title = %album.title,
                error = %message,
                "Batch rejected although the album still resolves; skipping batch"
            ),
            Err(err) => warn!(
                album_id = %album_id,
                error = %message,
                lookup_error = %err,
                "Destination album is gone; skipping batch"
            ),
        }
    }
}
