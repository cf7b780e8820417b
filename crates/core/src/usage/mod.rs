//! Usage counters kept in an external store.
//!
//! Counts are never cached in process memory: every increment and read is
//! a round trip to the configured [`CounterStore`], so several service
//! instances can share one set of totals.

mod client;
mod error;
mod sqlite;
mod upstash;

use std::sync::Arc;

use async_trait::async_trait;

pub use client::{UsageCounters, UsageTotals, TOTAL_FILES_KEY, TOTAL_REQUESTS_KEY};
pub use error::StoreError;
pub use sqlite::SqliteCounterStore;
pub use upstash::UpstashCounterStore;

use crate::config::{CounterBackend, CounterStoreConfig};

/// A durable key/counter store with an atomic increment primitive.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Returns the name of this store implementation.
    fn name(&self) -> &str;

    /// Atomically adds `delta` to `key`, creating it at zero if absent.
    /// Returns the new value.
    async fn increment(&self, key: &str, delta: i64) -> Result<i64, StoreError>;

    /// Current value of `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError>;
}

/// Build the counter store selected by configuration.
pub fn create_counter_store(
    config: &CounterStoreConfig,
) -> Result<Arc<dyn CounterStore>, StoreError> {
    match config.backend {
        CounterBackend::Sqlite => Ok(Arc::new(SqliteCounterStore::new(&config.sqlite.path)?)),
        CounterBackend::Upstash => {
            let upstash = config.upstash.clone().ok_or_else(|| {
                StoreError::Connection("upstash backend selected but not configured".to_string())
            })?;
            Ok(Arc::new(UpstashCounterStore::new(upstash)?))
        }
    }
}
