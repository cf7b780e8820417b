//! Usage counter client.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::{CounterStore, StoreError};

/// Counter key for batches served.
pub const TOTAL_REQUESTS_KEY: &str = "total_requests";
/// Counter key for files converted.
pub const TOTAL_FILES_KEY: &str = "total_files_transformed";

/// Snapshot of the usage counters. A field is `None` when the counter was
/// never written or could not be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageTotals {
    pub total_requests: Option<i64>,
    pub total_files_transformed: Option<i64>,
}

/// Records and reads service usage through a [`CounterStore`].
#[derive(Clone)]
pub struct UsageCounters {
    store: Arc<dyn CounterStore>,
}

impl UsageCounters {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn CounterStore {
        self.store.as_ref()
    }

    /// Records one served batch of `file_count` files.
    ///
    /// Not idempotent: calling it twice counts twice.
    pub async fn increment_usage(&self, file_count: usize) -> Result<(), StoreError> {
        let requests = self.store.increment(TOTAL_REQUESTS_KEY, 1).await?;
        let files = self
            .store
            .increment(TOTAL_FILES_KEY, file_count as i64)
            .await?;
        debug!(
            total_requests = requests,
            total_files_transformed = files,
            "Usage counters incremented"
        );
        Ok(())
    }

    /// Reads both counters. Store failures are logged and reported as
    /// `None`.
    pub async fn read_totals(&self) -> UsageTotals {
        let (total_requests, total_files_transformed) = futures::join!(
            self.read(TOTAL_REQUESTS_KEY),
            self.read(TOTAL_FILES_KEY)
        );
        UsageTotals {
            total_requests,
            total_files_transformed,
        }
    }

    async fn read(&self, key: &str) -> Option<i64> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, store = self.store.name(), error = %e, "Failed to read usage counter");
                None
            }
        }
    }
}
