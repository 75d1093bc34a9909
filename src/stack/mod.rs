//! Stack Module
//!
//! Value stacks and the guards that restore their depth after a call.

mod guard;
mod thread;
mod value_stack;

pub use guard::{stacked, StackGuard};
pub use thread::{
    pop_value, push_value, stack_len, stacked_method, with_thread_stack, StackValue,
    ThreadStackGuard,
};
pub use value_stack::ValueStack;
