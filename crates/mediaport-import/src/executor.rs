//! Idempotent execution of side-effecting import operations
//!
//! Every remote creation (album or media item) runs through an executor
//! keyed by the entity's source identity. A key that already holds a
//! result is never re-executed, which pins destination identities for the
//! lifetime of a job run: once an album resolves to a remote id, every
//! item referencing it sees the same id. Failures are recorded but never
//! cached, so a later call with the same key re-attempts the operation.
//!
//! One executor instance exists per job run; it is not persisted across
//! process restarts. Durable backing keyed by job id is an extension
//! point, not part of this layer.

use crate::error::Result;
use mediaport_common::types::ErrorDetail;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory key → result memoization with error collection
///
/// Same-key callers serialize on a per-key guard (the first caller
/// executes, later callers observe its cached result); distinct keys
/// proceed fully concurrently.
#[derive(Debug, Default)]
pub struct InMemoryIdempotentExecutor {
    slots: Mutex<HashMap<String, Arc<Mutex<Option<Value>>>>>,
    errors: Mutex<HashMap<String, ErrorDetail>>,
}

impl InMemoryIdempotentExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `operation` at most once for `key`
    ///
    /// Returns the cached result without invoking `operation` when the key
    /// already succeeded. On success the result is cached under `key` and
    /// any previously recorded error for the key is dropped. On failure a
    /// structured error is recorded for the key and the failure is
    /// re-raised; the key stays uncached and eligible for retry.
    pub async fn execute_or_throw<T, F, Fut>(
        &self,
        key: &str,
        item_name: &str,
        operation: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let slot = self.slot(key).await;
        let mut guard = slot.lock().await;

        if let Some(cached) = guard.as_ref() {
            tracing::debug!(key = %key, item = %item_name, "Returning cached result");
            return Ok(serde_json::from_value(cached.clone())?);
        }

        match operation().await {
            Ok(result) => {
                *guard = Some(serde_json::to_value(&result)?);
                self.errors.lock().await.remove(key);
                tracing::debug!(key = %key, item = %item_name, "Cached operation result");
                Ok(result)
            },
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(key = %key, item = %item_name, error = %message, "Operation failed");
                self.errors
                    .lock()
                    .await
                    .insert(key.to_string(), ErrorDetail::new(key, &message));
                Err(err)
            },
        }
    }

    /// Execute `operation` at most once for `key`, swallowing failures
    ///
    /// The failure is still recorded in the error set; the caller gets
    /// `None` and sibling work continues.
    pub async fn execute_and_swallow<T, F, Fut>(
        &self,
        key: &str,
        item_name: &str,
        operation: F,
    ) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.execute_or_throw(key, item_name, operation).await.ok()
    }

    /// Whether `key` holds a cached (successful) result
    ///
    /// Blocks while an execution for `key` is in flight, then reports the
    /// outcome of that execution.
    pub async fn is_key_cached(&self, key: &str) -> bool {
        // Drop the table guard before waiting on the key guard so other
        // keys stay unblocked.
        let slot = self.slots.lock().await.get(key).cloned();
        match slot {
            Some(slot) => slot.lock().await.is_some(),
            None => false,
        }
    }

    /// Cached result for `key`, if any
    pub async fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let slot = self.slots.lock().await.get(key)?.clone();
        let guard = slot.lock().await;
        guard
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Snapshot of the recorded errors, at most one entry per key
    pub async fn get_errors(&self) -> Vec<ErrorDetail> {
        self.errors.lock().await.values().cloned().collect()
    }

    async fn slot(&self, key: &str) -> Arc<Mutex<Option<Value>>> {
        self.slots
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }
}
