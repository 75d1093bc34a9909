//! Memo Guard - call wrappers for memoization and stack realignment
//!
//! Provides a bounded LRU memoization cache with compute-once semantics and
//! guards that restore a value stack to its entry depth after a call.

pub mod config;
pub mod error;
pub mod memo;
pub mod stack;

pub use config::MemoConfig;
pub use error::{MemoError, Result};
pub use memo::{MemoCache, MemoKey, MemoStats, Memoized, OperationId};
pub use stack::{stacked, stacked_method, StackGuard, ThreadStackGuard, ValueStack};
