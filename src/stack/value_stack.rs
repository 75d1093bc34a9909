//! Value Stack Module
//!
//! Ordered push/pop sequence used as a side channel between nested calls.

// == Value Stack ==
/// Last-in first-out sequence of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStack<T> {
    values: Vec<T>,
}

impl<T> ValueStack<T> {
    // == Constructor ==
    /// Creates an empty stack.
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    // == Push ==
    /// Places `value` on top of the stack.
    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    // == Pop ==
    /// Removes and returns the top value, or None if the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.values.pop()
    }

    /// Returns the most recently pushed value.
    pub fn peek(&self) -> Option<&T> {
        self.values.last()
    }

    // == Length ==
    /// Returns the stack depth.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    // == Is Empty ==
    /// Returns true if the stack holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // == Truncate ==
    /// Drops values above depth `len`. Never grows the stack.
    ///
    /// Returns the number of values dropped.
    pub fn truncate(&mut self, len: usize) -> usize {
        let dropped = self.values.len().saturating_sub(len);
        self.values.truncate(len);
        dropped
    }

    /// Iterates from the bottom of the stack to the top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }
}

impl<T> Default for ValueStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ValueStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
