//! Import configuration
//!
//! Tuning knobs for batch sizing, destination pacing, and the remote
//! content fetcher.

use crate::error::{ImportError, Result};
use serde::{Deserialize, Serialize};

/// Main import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Multiplier on the default inter-batch delay (1.0 = default pacing).
    /// Raising it slows batch-create calls down without redeploying.
    #[serde(default = "default_rate_limit_factor")]
    pub rate_limit_factor: f64,
    /// Maximum items submitted in one batch-create call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Connection timeout for remote content fetches in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// User agent sent by the remote content fetcher
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_rate_limit_factor() -> f64 {
    1.0
}

fn default_batch_size() -> usize {
    // Destination batch ceiling observed in practice
    49
}

fn default_fetch_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    "Mediaport-Importer/1.0".to_string()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            rate_limit_factor: default_rate_limit_factor(),
            batch_size: default_batch_size(),
            fetch_timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ImportConfig {
    /// Load import configuration from environment variables
    ///
    /// Environment variables:
    /// - `MEDIAPORT_RATE_LIMIT_FACTOR`: pacing multiplier (default 1.0)
    /// - `MEDIAPORT_BATCH_SIZE`: items per batch-create call (default 49)
    /// - `MEDIAPORT_FETCH_TIMEOUT_SECS`: fetch timeout (default 60)
    /// - `MEDIAPORT_USER_AGENT`: fetcher user agent
    pub fn from_env() -> Result<Self> {
        let config = Self {
            rate_limit_factor: std::env::var("MEDIAPORT_RATE_LIMIT_FACTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_rate_limit_factor),
            batch_size: std::env::var("MEDIAPORT_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_batch_size),
            fetch_timeout_secs: std::env::var("MEDIAPORT_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_fetch_timeout),
            user_agent: std::env::var("MEDIAPORT_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.rate_limit_factor > 0.0) {
            return Err(ImportError::Config(format!(
                "rate_limit_factor must be positive, got {}",
                self.rate_limit_factor
            )));
        }
        if self.batch_size == 0 {
            return Err(ImportError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
