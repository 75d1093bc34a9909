//! Stack Guard Module
//!
//! RAII guard restoring a [`ValueStack`] to its entry depth.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::stack::ValueStack;

// == Stack Guard ==
/// Borrows a stack and truncates it back to its entry depth when dropped.
///
/// The wrapped code pushes and pops through the guard (it derefs to the
/// stack). Whatever way the scope ends (normal return, `?`, panic), values
/// pushed above the checkpoint are dropped. A stack that ends up shorter
/// than the checkpoint is left as it is.
///
/// Guards nest: a guard taken over another guard restores its own
/// checkpoint first, then the outer one restores its own.
#[derive(Debug)]
pub struct StackGuard<'a, T> {
    stack: &'a mut ValueStack<T>,
    checkpoint: usize,
}

impl<'a, T> StackGuard<'a, T> {
    /// Records the current depth of `stack`.
    pub fn new(stack: &'a mut ValueStack<T>) -> Self {
        let checkpoint = stack.len();
        Self { stack, checkpoint }
    }

    /// Depth the stack is restored to on drop.
    pub fn checkpoint(&self) -> usize {
        self.checkpoint
    }
}

impl<T> Deref for StackGuard<'_, T> {
    type Target = ValueStack<T>;

    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl<T> DerefMut for StackGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stack
    }
}

impl<T> Drop for StackGuard<'_, T> {
    fn drop(&mut self) {
        let dropped = self.stack.truncate(self.checkpoint);
        if dropped > 0 {
            debug!(
                checkpoint = self.checkpoint,
                dropped, "stack guard dropped leftover values"
            );
        }
    }
}

// == Stacked ==
/// Runs `f` with `stack`, restoring the entry depth afterwards.
///
/// The result of `f`, including an `Err`, is returned unchanged.
pub fn stacked<T, R, F>(stack: &mut ValueStack<T>, f: F) -> R
where
    F: FnOnce(&mut ValueStack<T>) -> R,
{
    let mut guard = StackGuard::new(stack);
    f(&mut *guard)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    fn stack_of(depth: u32) -> ValueStack<u32> {
        (0..depth).collect()
    }

    #[test]
    fn test_success_leaves_balanced_stack() {
        let mut stack = stack_of(2);
        let result = stacked(&mut stack, |s| {
            s.push(10);
            s.pop()
        });

        assert_eq!(result, Some(10));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_failure_restores_depth() {
        let mut stack = stack_of(2);
        let result: Result<(), &str> = stacked(&mut stack, |s| {
            s.push(10);
            s.push(11);
            s.push(12);
            Err("failed after pushing")
        });

        assert_eq!(result, Err("failed after pushing"));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek(), Some(&1));
    }

    #[test]
    fn test_early_return_via_question_mark_restores_depth() {
        fn pushes_then_fails(stack: &mut ValueStack<u32>) -> Result<u32, String> {
            let mut guard = StackGuard::new(stack);
            guard.push(7);
            let parsed: u32 = "not a number".parse().map_err(|_| "parse".to_string())?;
            guard.push(parsed);
            Ok(parsed)
        }

        let mut stack = stack_of(1);
        assert!(pushes_then_fails(&mut stack).is_err());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_shrunk_stack_is_not_regrown() {
        let mut stack = stack_of(4);
        stacked(&mut stack, |s| {
            s.push(99);
            s.pop();
            s.pop();
            s.pop();
        });

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_panic_restores_depth() {
        let mut stack = stack_of(3);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            stacked(&mut stack, |s| {
                s.push(5);
                s.push(6);
                panic!("wrapped call panicked");
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_nested_guards_restore_own_checkpoints() {
        let mut stack = stack_of(1);
        {
            let mut outer = StackGuard::new(&mut stack);
            outer.push(1);
            assert_eq!(outer.checkpoint(), 1);
            {
                let mut inner = StackGuard::new(&mut *outer);
                assert_eq!(inner.checkpoint(), 2);
                inner.push(2);
                inner.push(3);
            }
            assert_eq!(outer.len(), 2);
            outer.push(4);
        }
        assert_eq!(stack.len(), 1);
    }
}
