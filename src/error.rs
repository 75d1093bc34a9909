//! Error types for memoization and stack guards
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Memo Error Enum ==
/// Errors raised by the crate itself.
///
/// Failures of a wrapped operation are never wrapped in this type; they reach
/// the caller exactly as the operation returned them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// Cache capacity must be at least one entry
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Arguments could not be serialized into a memoization key
    #[error("Key serialization failed: {0}")]
    KeySerialization(String),

    /// Configuration value could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl serde::ser::Error for MemoError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        MemoError::KeySerialization(msg.to_string())
    }
}

impl From<serde_json::Error> for MemoError {
    fn from(err: serde_json::Error) -> Self {
        MemoError::KeySerialization(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for crate operations.
pub type Result<T> = std::result::Result<T, MemoError>;
