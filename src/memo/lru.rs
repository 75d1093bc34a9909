//! Recency Tracker Module
//!
//! Keeps memoization keys in access order for LRU eviction.

use std::collections::VecDeque;

use crate::memo::MemoKey;

// == Recency Tracker ==
/// Access order of cached keys.
///
/// - Front = most recently used
/// - Back = least recently used
///
/// Every key appears at most once.
#[derive(Debug, Default)]
pub(crate) struct RecencyTracker {
    order: VecDeque<MemoKey>,
}

impl RecencyTracker {
    // == Constructor ==
    /// Creates an empty tracker with room for `capacity` keys.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
        }
    }

    // == Touch ==
    /// Marks `key` as most recently used, tracking it if new.
    pub(crate) fn touch(&mut self, key: MemoKey) {
        match self.order.iter().position(|k| *k == key) {
            Some(0) => {}
            Some(index) => {
                self.order.remove(index);
                self.order.push_front(key);
            }
            None => self.order.push_front(key),
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub(crate) fn evict_oldest(&mut self) -> Option<MemoKey> {
        self.order.pop_back()
    }

    // == Iter Recent ==
    /// Iterates keys from most to least recently used.
    pub(crate) fn iter_recent(&self) -> impl Iterator<Item = MemoKey> + '_ {
        self.order.iter().copied()
    }
}
