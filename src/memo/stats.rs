//! Memoization Statistics Module
//!
//! Counts hits, misses, evictions and uncached failures.

use serde::Serialize;

// == Memo Stats ==
/// Snapshot of a cache's counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoStats {
    /// Calls served from the cache
    pub hits: u64,
    /// Calls that had to invoke the wrapped operation
    pub misses: u64,
    /// Entries dropped by the LRU policy
    pub evictions: u64,
    /// Wrapped calls that failed and were therefore not cached
    pub failures: u64,
    /// Current number of cached entries
    pub entries: usize,
    /// Maximum number of cached entries
    pub capacity: usize,
}

impl MemoStats {
    // == Constructor ==
    /// Creates zeroed counters for a cache of `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Counts a call served from the cache.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a call that invoked the operation.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an entry dropped by the LRU policy.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Counts a failed call left uncached.
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }
}
