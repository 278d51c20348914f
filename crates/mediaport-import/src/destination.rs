//! Destination service collaborator
//!
//! The REST transport behind this trait lives outside this crate; the
//! import core only depends on the operations and the typed failure
//! kinds. Systemic batch failures are classified by [`DestinationError`]
//! variant, never by matching message text, and anything unclassified is
//! treated as fatal by callers.

use crate::models::AuthData;
use crate::store::ResolvedContent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure kinds reported by the destination service
#[derive(Error, Debug)]
pub enum DestinationError {
    /// The album id attached to a batch-create call is unknown or invalid
    #[error("destination album not found: {0}")]
    AlbumNotFound(String),

    /// Content upload rejected, e.g. the computed hash did not match the
    /// expected hash
    #[error("upload rejected: {0}")]
    Upload(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid or expired credentials: {0}")]
    InvalidToken(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unclassified destination failure: {0}")]
    Unclassified(String),
}

/// Request payload for creating a destination album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlbum {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A destination-side album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAlbum {
    pub id: String,
    pub title: String,
}

/// Opaque token handed back by a content upload, consumed by batch create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadToken(pub String);

impl std::fmt::Display for UploadToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a batch-create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMediaItem {
    pub upload_token: UploadToken,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Per-item status in a batch-create response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatus {
    /// gRPC-style status code; 0 means OK
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ItemStatus {
    pub fn ok() -> Self {
        Self {
            code: 0,
            message: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// A destination-side media item created by a batch call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteMediaItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry of a batch-create response, matched back to its request by
/// upload token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    pub upload_token: UploadToken,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<RemoteMediaItem>,
}

/// Response of one batch-create call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchCreateResponse {
    pub results: Vec<ItemResult>,
}

/// Remote creation API of the destination service
#[async_trait]
pub trait DestinationApi: Send + Sync {
    /// Create a destination album; one remote call per invocation
    async fn create_album(
        &self,
        auth: &AuthData,
        album: &NewAlbum,
    ) -> Result<RemoteAlbum, DestinationError>;

    /// Upload raw content, returning an upload token
    ///
    /// When `expected_hash` is given the destination verifies the content
    /// against it and fails with [`DestinationError::Upload`] on mismatch.
    async fn upload_content(
        &self,
        auth: &AuthData,
        content: ResolvedContent,
        expected_hash: Option<&str>,
    ) -> Result<UploadToken, DestinationError>;

    /// Submit previously uploaded items for creation in one batched call,
    /// scoped to `album_id` when given
    async fn create_items_batch(
        &self,
        auth: &AuthData,
        album_id: Option<&str>,
        items: Vec<NewMediaItem>,
    ) -> Result<BatchCreateResponse, DestinationError>;

    /// Diagnostic album lookup, used when a batch call reports the album
    /// as unknown
    async fn get_album(
        &self,
        auth: &AuthData,
        album_id: &str,
    ) -> Result<RemoteAlbum, DestinationError>;
}
