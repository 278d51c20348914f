//! Source-side models for a migration job
//!
//! Inputs are immutable descriptions of what the source holds; all
//! destination-side identity lives in the idempotent executor.

use chrono::{DateTime, Utc};
use mediaport_common::types::ErrorDetail;
use serde::{Deserialize, Serialize};

pub use mediaport_common::types::JobId;

/// A single media object to migrate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Display title, also used as the destination file name
    pub title: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Media type, e.g. "image/jpeg"
    pub media_type: String,
    /// URL the content can be fetched from when not staged
    pub fetchable_url: String,
    /// Identity in the source system
    pub old_id: String,
    /// Source album this item belongs to, if any
    pub old_album_id: Option<String>,
    /// True when the content was staged into the job-scoped byte store
    /// instead of being fetchable from `fetchable_url`
    pub in_temp_store: bool,
    /// Expected content hash (hex digest), verified at upload time
    pub content_hash: Option<String>,
}

impl MediaItem {
    /// Stable idempotency key for this item within a job
    ///
    /// Items are keyed by their old album so the same source photo
    /// appearing in two albums imports once per album.
    pub fn idempotent_id(&self) -> String {
        match &self.old_album_id {
            Some(album_id) => format!("{}-{}", album_id, self.old_id),
            None => self.old_id.clone(),
        }
    }
}

/// A source album (destination-side grouping entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAlbum {
    /// Identity in the source system
    pub old_id: String,
    /// Display name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
}

impl MediaAlbum {
    /// Stable idempotency key for this album within a job
    pub fn idempotent_id(&self) -> String {
        self.old_id.clone()
    }
}

/// Per-job input bundle: every album and item the job should migrate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaCollection {
    pub albums: Vec<MediaAlbum>,
    pub items: Vec<MediaItem>,
}

impl MediaCollection {
    pub fn new(albums: Vec<MediaAlbum>, items: Vec<MediaItem>) -> Self {
        Self { albums, items }
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty() && self.items.is_empty()
    }
}

/// Opaque bearer credential passed through to destination calls
///
/// Token acquisition and refresh happen upstream.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthData {
    pub access_token: String,
}

impl AuthData {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl std::fmt::Debug for AuthData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token itself
        f.debug_struct("AuthData").finish_non_exhaustive()
    }
}

/// Outcome ledger for one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Total bytes of successfully created items
    pub imported_bytes: u64,
    /// Item keys cached as succeeded at the end of the run
    pub items_imported: usize,
    /// Albums resolved to a destination identity
    pub albums_imported: usize,
    /// Error set accumulated in the executor, one entry per failed key
    pub errors: Vec<ErrorDetail>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(old_id: &str, album: Option<&str>) -> MediaItem {
        MediaItem {
            title: "Model photo title".to_string(),
            description: Some("Model photo description".to_string()),
            media_type: "image/jpeg".to_string(),
            fetchable_url: "https://source.example/photo.jpg".to_string(),
            old_id: old_id.to_string(),
            old_album_id: album.map(|a| a.to_string()),
            in_temp_store: false,
            content_hash: None,
        }
    }

    #[test]
    fn test_item_key_includes_album() {
        assert_eq!(item("photo1", Some("album1")).idempotent_id(), "album1-photo1");
    }

    #[test]
    fn test_item_key_without_album() {
        assert_eq!(item("photo1", None).idempotent_id(), "photo1");
    }

    #[test]
    fn test_auth_debug_redacts_token() {
        let auth = AuthData::new("super-secret");
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("super-secret"));
    }
}
