//! Import-specific error types

use crate::destination::DestinationError;
use thiserror::Error;

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors raised by the import pipeline
///
/// Item-level failures are recorded in the executor's error set and
/// swallowed so sibling items keep going; only failures that leave the
/// job's progress ambiguous are surfaced through this type.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Systemic destination failure (transport, permission, unclassified)
    #[error("destination error: {0}")]
    Destination(#[from] DestinationError),

    /// Remote content could not be fetched
    #[error("content fetch failed: {0}")]
    Fetch(String),

    /// Job-scoped staged content could not be read or removed
    #[error("temporary store error: {0}")]
    TempStore(String),

    /// A batch-create response rejected a single item
    #[error("media item could not be created: status {code} ({message})")]
    ItemRejected {
        id: String,
        code: i32,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] mediaport_common::MediaportError),
}
