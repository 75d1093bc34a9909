//! Memo Cache Module
//!
//! Bounded LRU map from memoization keys to computed values, guarded by a
//! single lock shared by every operation using the cache.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::MemoConfig;
use crate::error::{MemoError, Result};
use crate::memo::{MemoKey, MemoStats, RecencyTracker};

// == Memo Cache ==
/// Compute-once cache with least-recently-used eviction.
///
/// All lookups, insertions, evictions and the wrapped computations
/// themselves run under one mutex. A key that is present was produced by
/// exactly one successful invocation; failed invocations leave no entry.
///
/// The lock is not reentrant: a computation must not call back into the
/// same cache, or it deadlocks.
#[derive(Debug)]
pub struct MemoCache<V> {
    table: Mutex<MemoTable<V>>,
}

#[derive(Debug)]
struct MemoTable<V> {
    entries: HashMap<MemoKey, V>,
    lru: RecencyTracker,
    stats: MemoStats,
    capacity: usize,
}

impl<V: Clone> MemoCache<V> {
    // == Constructor ==
    /// Creates an empty cache retaining at most `capacity` keys.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MemoError::InvalidCapacity(capacity));
        }

        Ok(Self {
            table: Mutex::new(MemoTable {
                entries: HashMap::with_capacity(capacity),
                lru: RecencyTracker::with_capacity(capacity),
                stats: MemoStats::new(capacity),
                capacity,
            }),
        })
    }

    /// Creates a cache sized by `config`.
    pub fn from_config(config: &MemoConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity)
    }

    // == Get Or Try Insert ==
    /// Returns the value cached under `key`, computing it with `f` on a miss.
    ///
    /// `f` runs while the cache lock is held. Its error is returned as-is and
    /// nothing is stored, so the next call for `key` runs `f` again. The lock
    /// is released on every path out, including a panic inside `f`.
    pub fn get_or_try_insert_with<E, F>(&self, key: MemoKey, f: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let mut table = self.table.lock();

        if let Some(value) = table.lookup(key) {
            trace!(%key, "memo hit");
            return Ok(value);
        }

        debug!(%key, "memo miss, computing");
        match f() {
            Ok(value) => {
                table.insert(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                table.stats.record_failure();
                debug!(%key, "memoized computation failed, result not cached");
                Err(err)
            }
        }
    }

    /// Infallible form of [`MemoCache::get_or_try_insert_with`].
    pub fn get_or_insert_with<F>(&self, key: MemoKey, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        match self.get_or_try_insert_with(key, || Ok::<V, std::convert::Infallible>(f())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    // == Get ==
    /// Looks up `key` without computing anything. A hit refreshes recency.
    pub fn get(&self, key: MemoKey) -> Option<V> {
        self.table.lock().lookup(key)
    }

    /// Checks for `key` without touching recency or counters.
    pub fn contains(&self, key: MemoKey) -> bool {
        self.table.lock().entries.contains_key(&key)
    }

    /// Cached keys from most to least recently used.
    pub fn keys(&self) -> Vec<MemoKey> {
        self.table.lock().lru.iter_recent().collect()
    }

    // == Length ==
    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.table.lock().entries.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.table.lock().entries.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of cached entries.
    pub fn capacity(&self) -> usize {
        self.table.lock().capacity
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> MemoStats {
        let table = self.table.lock();
        let mut stats = table.stats.clone();
        stats.entries = table.entries.len();
        stats
    }
}

impl<V: Clone> MemoTable<V> {
    fn lookup(&mut self, key: MemoKey) -> Option<V> {
        match self.entries.get(&key) {
            Some(value) => {
                let value = value.clone();
                self.lru.touch(key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    fn insert(&mut self, key: MemoKey, value: V) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "memo entry evicted");
            }
        }

        self.entries.insert(key, value);
        self.lru.touch(key);
    }
}
