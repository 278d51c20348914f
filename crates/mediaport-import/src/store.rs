//! Job store collaborators
//!
//! Durable job metadata and the job-scoped byte store live outside this
//! crate; the traits here are the boundary the import core depends on.
//! [`InMemoryJobStore`] is the local implementation used by tests and
//! single-process runs.

use crate::error::{ImportError, Result};
use crate::models::JobId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Mutex;

/// Byte payload resolved for upload: a stream plus its declared length
///
/// The length is what the source declared (a Content-Length header or the
/// staged blob size), not a count of bytes read; it is what the import
/// ledger accumulates.
pub struct ResolvedContent {
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
    pub length: u64,
}

impl ResolvedContent {
    pub fn new(reader: Box<dyn AsyncRead + Send + Unpin>, length: u64) -> Self {
        Self { reader, length }
    }

    /// Wrap an in-memory buffer; the declared length is the buffer size
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let length = bytes.len() as u64;
        Self {
            reader: Box::new(std::io::Cursor::new(bytes)),
            length,
        }
    }

    /// Drain the stream into memory (used by destination implementations)
    pub async fn into_bytes(mut self) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.length as usize);
        self.reader.read_to_end(&mut buffer).await?;
        Ok(buffer)
    }
}

impl std::fmt::Debug for ResolvedContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedContent")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Metadata recorded for a migration job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobMetadata {
    /// BCP 47 language tag of the requesting user, when known
    pub user_locale: Option<String>,
}

/// Read-only job metadata lookup
#[async_trait]
pub trait JobMetadataStore: Send + Sync {
    async fn find_job(&self, job_id: JobId) -> Result<Option<JobMetadata>>;
}

/// Job-scoped staged content
///
/// Blobs are written by an upstream export step and consumed here; a blob
/// must only be removed after its upload has been acknowledged.
#[async_trait]
pub trait JobByteStore: Send + Sync {
    async fn get_stream(&self, job_id: JobId, data_id: &str) -> Result<ResolvedContent>;

    async fn remove_data(&self, job_id: JobId, data_id: &str) -> Result<()>;
}

/// In-memory job store for tests and single-process runs
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<JobId, JobMetadata>>,
    data: Mutex<HashMap<(JobId, String), Vec<u8>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register job metadata
    pub async fn put_job(&self, job_id: JobId, metadata: JobMetadata) {
        self.jobs.lock().await.insert(job_id, metadata);
    }

    /// Stage a blob for a job
    pub async fn put_data(&self, job_id: JobId, data_id: &str, bytes: Vec<u8>) {
        self.data
            .lock()
            .await
            .insert((job_id, data_id.to_string()), bytes);
    }

    /// Whether a staged blob is still present
    pub async fn has_data(&self, job_id: JobId, data_id: &str) -> bool {
        self.data
            .lock()
            .await
            .contains_key(&(job_id, data_id.to_string()))
    }
}

#[async_trait]
impl JobMetadataStore for InMemoryJobStore {
    async fn find_job(&self, job_id: JobId) -> Result<Option<JobMetadata>> {
        Ok(self.jobs.lock().await.get(&job_id).cloned())
    }
}

#[async_trait]
impl JobByteStore for InMemoryJobStore {
    async fn get_stream(&self, job_id: JobId, data_id: &str) -> Result<ResolvedContent> {
        let data = self.data.lock().await;
        let bytes = data
            .get(&(job_id, data_id.to_string()))
            .ok_or_else(|| ImportError::TempStore(format!("no staged data for {data_id}")))?;
        Ok(ResolvedContent::from_bytes(bytes.clone()))
    }

    async fn remove_data(&self, job_id: JobId, data_id: &str) -> Result<()> {
        self.data
            .lock()
            .await
            .remove(&(job_id, data_id.to_string()))
            .ok_or_else(|| ImportError::TempStore(format!("no staged data for {data_id}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_resolved_content_from_bytes() {
        let content = ResolvedContent::from_bytes(b"TestingBytes".to_vec());
        assert_eq!(content.length, 12);
        assert_eq!(content.into_bytes().await.unwrap(), b"TestingBytes");
    }

    #[tokio::test]
    async fn test_staged_blob_roundtrip() {
        let store = InMemoryJobStore::new();
        let job_id = Uuid::new_v4();

        store.put_data(job_id, "photo1", b"TestingBytes".to_vec()).await;
        assert!(store.has_data(job_id, "photo1").await);

        let content = store.get_stream(job_id, "photo1").await.unwrap();
        assert_eq!(content.length, 12);

        store.remove_data(job_id, "photo1").await.unwrap();
        assert!(!store.has_data(job_id, "photo1").await);
        assert!(store.get_stream(job_id, "photo1").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_missing_blob_is_an_error() {
        let store = InMemoryJobStore::new();
        assert!(store.remove_data(Uuid::new_v4(), "gone").await.is_err());
    }

    #[tokio::test]
    async fn test_find_job_returns_metadata() {
        let store = InMemoryJobStore::new();
        let job_id = Uuid::new_v4();
        store
            .put_job(
                job_id,
                JobMetadata {
                    user_locale: Some("it".to_string()),
                },
            )
            .await;

        let metadata = store.find_job(job_id).await.unwrap().unwrap();
        assert_eq!(metadata.user_locale.as_deref(), Some("it"));
        assert!(store.find_job(Uuid::new_v4()).await.unwrap().is_none());
    }
}
