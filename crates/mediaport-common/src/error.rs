//! Error types for Mediaport

use thiserror::Error;

/// Result type alias for Mediaport operations
pub type Result<T> = std::result::Result<T, MediaportError>;

/// Main error type for Mediaport
#[derive(Error, Debug)]
pub enum MediaportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Staged data not found: {0}")]
    StagedDataNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
