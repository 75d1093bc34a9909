//! Configuration Module
//!
//! Loads memoization settings from environment variables.

use std::env;

use tracing::warn;

use crate::error::{MemoError, Result};
use crate::memo::DEFAULT_CAPACITY;

/// Environment variable holding the cache capacity.
pub const CAPACITY_ENV: &str = "MEMO_CACHE_CAPACITY";

/// Memoization cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoConfig {
    /// Maximum number of distinct keys a cache retains
    pub capacity: usize,
}

impl MemoConfig {
    /// Creates a config with an explicit capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Creates a new MemoConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_CACHE_CAPACITY` - Maximum cached keys (default: 1024)
    ///
    /// Unparseable or zero values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`MemoConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let capacity = match lookup(CAPACITY_ENV) {
            None => DEFAULT_CAPACITY,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => {
                    warn!(
                        "Ignoring invalid {}={:?}, using default {}",
                        CAPACITY_ENV, raw, DEFAULT_CAPACITY
                    );
                    DEFAULT_CAPACITY
                }
            },
        };

        Self { capacity }
    }

    /// Checks that the configuration can back a cache.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(MemoError::InvalidConfig(
                "capacity must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
