//! Memoized Operation Module
//!
//! Binds a named operation to a shared [`MemoCache`] so callers invoke it
//! like a plain function.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::MemoError;
use crate::memo::{MemoCache, MemoKey, OperationId};

// == Memoized ==
/// A function whose results are cached per distinct argument set.
///
/// Several `Memoized` operations may share one cache; they are serialized by
/// its lock and kept apart by their [`OperationId`]s.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use memo_guard::{MemoCache, MemoError, Memoized, OperationId};
///
/// let cache = Arc::new(MemoCache::new(16)?);
/// let square = Memoized::new(cache, OperationId::new("docs::square"), |(x,): &(i64,)| {
///     Ok::<_, MemoError>(x * x)
/// });
/// assert_eq!(square.call(&(4,))?, 16);
/// # Ok::<(), MemoError>(())
/// ```
pub struct Memoized<V, F> {
    id: OperationId,
    cache: Arc<MemoCache<V>>,
    f: F,
}

impl<V: Clone, F> Memoized<V, F> {
    // == Constructor ==
    /// Binds `f`, identified by `id`, to `cache`.
    pub fn new(cache: Arc<MemoCache<V>>, id: OperationId, f: F) -> Self {
        Self { id, cache, f }
    }

    // == Call ==
    /// Invokes the operation with positional arguments, or returns the cached
    /// result of an earlier call with equal arguments.
    ///
    /// Errors from the operation are returned unchanged and are not cached.
    /// Arguments that cannot be serialized fail with
    /// [`MemoError::KeySerialization`] converted into `E`.
    pub fn call<A, E>(&self, args: &A) -> Result<V, E>
    where
        A: Serialize + ?Sized,
        F: Fn(&A) -> Result<V, E>,
        E: From<MemoError>,
    {
        let key = MemoKey::derive(self.id, args)?;
        self.cache.get_or_try_insert_with(key, || (self.f)(args))
    }

    /// Invokes an operation taking positional and keyword arguments.
    pub fn call_with_kwargs<A, K, E>(&self, args: &A, kwargs: &K) -> Result<V, E>
    where
        A: Serialize + ?Sized,
        K: Serialize + ?Sized,
        F: Fn(&A, &K) -> Result<V, E>,
        E: From<MemoError>,
    {
        let key = MemoKey::derive_with_kwargs(self.id, args, kwargs)?;
        self.cache.get_or_try_insert_with(key, || (self.f)(args, kwargs))
    }

    /// Returns the operation's identity.
    pub fn id(&self) -> OperationId {
        self.id
    }

    /// The cache backing this operation.
    pub fn cache(&self) -> &Arc<MemoCache<V>> {
        &self.cache
    }
}

impl<V, F> fmt::Debug for Memoized<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized").field("id", &self.id).finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    enum LookupError {
        Memo(MemoError),
        Unavailable,
    }

    impl From<MemoError> for LookupError {
        fn from(err: MemoError) -> Self {
            LookupError::Memo(err)
        }
    }

    fn shared_cache<V: Clone>() -> Arc<MemoCache<V>> {
        Arc::new(MemoCache::new(16).unwrap())
    }

    #[test]
    fn test_square_computed_once() {
        let calls = AtomicUsize::new(0);
        let square = Memoized::new(shared_cache(), OperationId::new("tests::square"), |(x,): &(i64,)| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, MemoError>(x * x)
        });

        assert_eq!(square.call(&(4,)), Ok(16));
        assert_eq!(square.call(&(4,)), Ok(16));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(square.cache().len(), 1);
    }

    #[test]
    fn test_operations_sharing_cache_stay_apart() {
        let cache = shared_cache();
        let double = Memoized::new(cache.clone(), OperationId::new("tests::double"), |x: &i64| {
            Ok::<_, MemoError>(x * 2)
        });
        let triple = Memoized::new(cache.clone(), OperationId::new("tests::triple"), |x: &i64| {
            Ok::<_, MemoError>(x * 3)
        });

        assert_eq!(double.call(&5), Ok(10));
        assert_eq!(triple.call(&5), Ok(15));
        assert_eq!(cache.len(), 2);
        assert_eq!(double.id().name(), "tests::double");
    }

    #[test]
    fn test_operation_error_passes_through() {
        let calls = AtomicUsize::new(0);
        let lookup = Memoized::new(shared_cache(), OperationId::new("tests::lookup"), |name: &str| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(LookupError::Unavailable)
            } else {
                Ok(name.len())
            }
        });

        assert_eq!(lookup.call("target"), Err(LookupError::Unavailable));
        assert_eq!(lookup.call("target"), Ok(6));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_key_error_converted_into_caller_error() {
        let op = Memoized::new(
            shared_cache(),
            OperationId::new("tests::pairs"),
            |pairs: &HashMap<(u8, u8), u8>| Ok::<_, LookupError>(pairs.len()),
        );

        let mut pairs = HashMap::new();
        pairs.insert((1, 2), 3);

        let result = op.call(&pairs);
        assert!(matches!(result, Err(LookupError::Memo(MemoError::KeySerialization(_)))));
        assert!(op.cache().is_empty());
    }

    #[test]
    fn test_infinities_are_not_served_from_each_other() {
        let calls = AtomicUsize::new(0);
        let sign = Memoized::new(shared_cache(), OperationId::new("tests::sign"), |(x,): &(f64,)| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, LookupError>(x.is_sign_positive())
        });

        assert!(matches!(
            sign.call(&(f64::INFINITY,)),
            Err(LookupError::Memo(MemoError::KeySerialization(_)))
        ));
        assert!(matches!(
            sign.call(&(f64::NEG_INFINITY,)),
            Err(LookupError::Memo(MemoError::KeySerialization(_)))
        ));
        assert_eq!(sign.call(&(-2.5,)), Ok(false));
        assert_eq!(sign.call(&(2.5,)), Ok(true));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_call_with_kwargs() {
        let calls = AtomicUsize::new(0);
        let request = Memoized::new(
            shared_cache(),
            OperationId::new("tests::request"),
            |(url,): &(&'static str,), opts: &serde_json::Value| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, MemoError>(format!("{}?{}", url, opts))
            },
        );

        let first = request
            .call_with_kwargs(&("http://target",), &json!({"timeout": 30, "retries": 2}))
            .unwrap();
        let second = request
            .call_with_kwargs(&("http://target",), &json!({"retries": 2, "timeout": 30}))
            .unwrap();
        let other = request
            .call_with_kwargs(&("http://target",), &json!({"retries": 3, "timeout": 30}))
            .unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
