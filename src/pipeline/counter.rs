//! Process-lifetime keyed counters.

use std::sync::Arc;

use dashmap::DashMap;

/// Shared increment table, one strictly increasing sequence per key.
///
/// Cloning is cheap and every clone sees the same counters. An increment holds
/// the key's shard lock for its read-modify-write, so concurrent increments of
/// one key are serialized while distinct keys rarely contend.
#[derive(Debug, Clone, Default)]
pub struct CounterStore {
    counters: Arc<DashMap<String, u64>>,
}

impl CounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment `key` (starting from zero) and return the new value.
    pub fn increment(&self, key: &str) -> u64 {
        let mut entry = self.counters.entry(key.to_owned()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current value of `key`, if it was ever incremented.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.counters.get(key).map(|v| *v)
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Check if no key has been incremented yet.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
