//! Mediaport Import Library
//!
//! Resumable, idempotent import of media collections into a destination
//! service that only exposes batched, rate-limited, partially-failing
//! remote creation APIs.
//!
//! # Pipeline
//!
//! 1. Destination albums are created once per source album via the
//!    [`executor::InMemoryIdempotentExecutor`], remapping old album ids to
//!    their new remote identity.
//! 2. Item content is resolved by the [`stager::ContentStager`] (remote
//!    fetch or job-scoped staged blob) and uploaded for an upload token.
//! 3. Upload tokens are submitted in one batched creation call per album
//!    grouping; per-item outcomes are partitioned into cached successes
//!    and recorded errors without aborting sibling items.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mediaport_import::config::ImportConfig;
//! use mediaport_import::fetch::HttpFetcher;
//! use mediaport_import::models::{AuthData, MediaCollection};
//! use mediaport_import::orchestrator::ImportOrchestrator;
//! use mediaport_import::store::InMemoryJobStore;
//!
//! # async fn run(destination: Arc<impl mediaport_import::destination::DestinationApi + 'static>) -> mediaport_import::Result<()> {
//! let config = ImportConfig::default();
//! let store = Arc::new(InMemoryJobStore::new());
//! let fetcher = Arc::new(HttpFetcher::new(&config)?);
//! let orchestrator =
//!     ImportOrchestrator::new(destination, fetcher, store.clone(), store, config)?;
//!
//! let job_id = uuid::Uuid::new_v4();
//! let auth = AuthData::new("access-token");
//! let summary = orchestrator.run(job_id, &auth, &MediaCollection::default()).await?;
//! tracing::info!(imported_bytes = summary.imported_bytes, "Import finished");
//! # Ok(())
//! # }
//! ```

pub mod albums;
pub mod config;
pub mod destination;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod models;
pub mod orchestrator;
pub mod stager;
pub mod store;
pub mod strings;
pub mod uploader;

pub use error::{ImportError, Result};
