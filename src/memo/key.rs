//! Memoization Key Module
//!
//! Derives fixed-width cache keys from an operation identity and its
//! serialized arguments.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::memo::canonical::canonical_json;
use crate::memo::KEY_SCHEME_VERSION;

// == Operation Id ==
/// Stable identity of a memoized operation.
///
/// Two calls share cache entries only when their ids are equal, so a name
/// must stay the same for the lifetime of the process and must not be
/// reused by an unrelated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(&'static str);

impl OperationId {
    /// Creates an id from a process-wide unique name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the name the id was created with.
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// == Memo Key ==
/// 64-bit digest of an operation id and its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MemoKey(u64);

impl MemoKey {
    /// Derives the key for a call with positional arguments only.
    ///
    /// Pass several arguments as a tuple. Equivalent to
    /// [`MemoKey::derive_with_kwargs`] with `&()` as keyword arguments.
    pub fn derive<A>(op: OperationId, args: &A) -> Result<Self>
    where
        A: Serialize + ?Sized,
    {
        Self::derive_with_kwargs(op, args, &())
    }

    /// Derives the key for a call with positional and keyword arguments.
    ///
    /// Both argument groups are converted to a canonical JSON form first:
    /// object members are sorted by name, so two maps holding the same
    /// entries produce the same key whatever their iteration order.
    pub fn derive_with_kwargs<A, K>(op: OperationId, args: &A, kwargs: &K) -> Result<Self>
    where
        A: Serialize + ?Sized,
        K: Serialize + ?Sized,
    {
        let args = canonical_json(args)?;
        let kwargs = canonical_json(kwargs)?;
        Ok(Self::digest(op, &args, &kwargs))
    }

    /// Wraps a raw key value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw key value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    // Each field is length-prefixed so adjacent fields cannot run into
    // each other (`"ab" + "c"` vs `"a" + "bc"`).
    fn digest(op: OperationId, args: &[u8], kwargs: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([KEY_SCHEME_VERSION]);
        for field in [op.name().as_bytes(), args, kwargs] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field);
        }
        let digest = hasher.finalize();

        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(head))
    }
}

impl fmt::Display for MemoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
