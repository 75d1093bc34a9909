//! Thread-Local Stack Module
//!
//! Per-thread value stack shared by nested operations, plus the guard that
//! realigns it when a wrapped call leaves values behind.

use std::cell::RefCell;
use std::marker::PhantomData;

use tracing::debug;

use crate::stack::ValueStack;

/// Values carried on the thread-local stack.
pub type StackValue = serde_json::Value;

thread_local! {
    static VALUE_STACK: RefCell<ValueStack<StackValue>> = const { RefCell::new(ValueStack::new()) };
}

// == Accessors ==
/// Pushes a value onto the calling thread's stack.
pub fn push_value(value: impl Into<StackValue>) {
    VALUE_STACK.with(|stack| stack.borrow_mut().push(value.into()));
}

/// Pops the most recently pushed value from the calling thread's stack.
pub fn pop_value() -> Option<StackValue> {
    VALUE_STACK.with(|stack| stack.borrow_mut().pop())
}

/// Returns the depth of the calling thread's stack.
pub fn stack_len() -> usize {
    VALUE_STACK.with(|stack| stack.borrow().len())
}

/// Gives read access to the calling thread's stack.
///
/// # Panics
/// If `f` pushes or pops through this module while the borrow is held.
pub fn with_thread_stack<R, F>(f: F) -> R
where
    F: FnOnce(&ValueStack<StackValue>) -> R,
{
    VALUE_STACK.with(|stack| f(&*stack.borrow()))
}

// == Thread Stack Guard ==
/// Restores the calling thread's stack depth when dropped.
///
/// Same restoration rule as [`StackGuard`](crate::stack::StackGuard): values
/// above the checkpoint are dropped, a shorter stack is left alone. The
/// guard belongs to the thread that created it and is not `Send`. Dropping
/// it inside [`with_thread_stack`] leaves the stack as it is.
#[derive(Debug)]
pub struct ThreadStackGuard {
    checkpoint: usize,
    _thread_bound: PhantomData<*const ()>,
}

impl ThreadStackGuard {
    /// Records the calling thread's current stack depth.
    pub fn enter() -> Self {
        Self {
            checkpoint: stack_len(),
            _thread_bound: PhantomData,
        }
    }

    /// Depth the thread's stack is restored to on drop.
    pub fn checkpoint(&self) -> usize {
        self.checkpoint
    }
}

impl Drop for ThreadStackGuard {
    fn drop(&mut self) {
        let checkpoint = self.checkpoint;
        // The thread-local may already be gone during thread teardown.
        let _ = VALUE_STACK.try_with(|stack| match stack.try_borrow_mut() {
            Ok(mut stack) => {
                let dropped = stack.truncate(checkpoint);
                if dropped > 0 {
                    debug!(checkpoint, dropped, "thread stack realigned");
                }
            }
            Err(_) => debug!(checkpoint, "thread stack borrowed during guard drop, skipped"),
        });
    }
}

// == Stacked Method ==
/// Runs `f`, then drops anything it left on the thread's stack above the
/// entry depth. The result of `f` is returned unchanged.
pub fn stacked_method<R, F>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ThreadStackGuard::enter();
    f()
}
