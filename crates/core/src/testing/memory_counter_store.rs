//! In-memory counter store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::usage::{CounterStore, StoreError};

/// Counter store held in a map, with a switch to simulate an outage.
///
/// Only meant for tests: production counts must live outside the process.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    values: Mutex<HashMap<String, i64>>,
    unavailable: AtomicBool,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Direct read that bypasses the outage switch.
    pub fn value(&self, key: &str) -> Option<i64> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Connection("memory store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        self.check_available()?;
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        let value = values.entry(key.to_string()).or_insert(0);
        *value += delta;
        Ok(*value)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        self.check_available()?;
        Ok(self.value(key))
    }
}
