//! Remote content fetching
//!
//! Resolves an item's source URL to a byte stream plus the connection's
//! declared content length.

use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::store::ResolvedContent;
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use std::time::Duration;
use tokio_util::io::StreamReader;
use tracing::debug;

/// Streaming fetch of source media content
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ResolvedContent>;
}

/// HTTP implementation of [`RemoteFetcher`]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new fetcher with timeout and user agent from config
    pub fn new(config: &ImportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ImportError::Fetch(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<ResolvedContent> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImportError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImportError::Fetch(format!(
                "HTTP error fetching {url}: {}",
                response.status()
            )));
        }

        let length = response.content_length().unwrap_or(0);
        debug!(url = %url, length, "Opened content stream");

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::other(e.to_string()));

        Ok(ResolvedContent::new(
            Box::new(StreamReader::new(stream)),
            length,
        ))
    }
}
