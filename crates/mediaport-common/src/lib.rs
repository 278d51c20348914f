//! Mediaport Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Mediaport project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all Mediaport
//! workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Checksums**: Content integrity verification utilities
//! - **Logging**: Centralized tracing initialization
//! - **Types**: Shared domain types and data structures
//!
//! # Example
//!
//! ```no_run
//! use mediaport_common::Result;
//! use mediaport_common::checksum::compute_checksum;
//! use mediaport_common::types::ChecksumAlgorithm;
//!
//! fn fingerprint(data: &[u8]) -> Result<String> {
//!     let mut cursor = std::io::Cursor::new(data);
//!     compute_checksum(&mut cursor, ChecksumAlgorithm::Sha256)
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{MediaportError, Result};
