//! Memo Module
//!
//! Compute-once caching of operation results with bounded LRU eviction.

mod canonical;
mod key;
mod lru;
mod memoized;
mod stats;
mod store;


// Re-export public types
pub use key::{MemoKey, OperationId};
pub(crate) use lru::RecencyTracker;
pub use memoized::Memoized;
pub use stats::MemoStats;
pub use store::MemoCache;

// == Public Constants ==
/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// Version byte mixed into every key digest; bump when the key layout changes
pub const KEY_SCHEME_VERSION: u8 = 2;
