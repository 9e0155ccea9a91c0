//! Growable stack used for the data stack and the backtrace stack
//!
//! [`Stack`] is a thin wrapper around a `Vec` whose operations all report
//! failure instead of panicking, so the engine can check the required depth
//! once and then mutate without partial updates.

/// Contiguous, grow-on-demand LIFO sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check that at least `depth` items are present
    pub fn has(&self, depth: usize) -> bool {
        self.items.len() >= depth
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    /// Replace the top item, returning the previous one
    pub fn replace_top(&mut self, value: T) -> Option<T> {
        let top = self.items.last_mut()?;
        Some(std::mem::replace(top, value))
    }

    /// Item `n` positions below the top (`0` is the top itself)
    pub fn nth_from_top(&self, n: usize) -> Option<&T> {
        let index = self.items.len().checked_sub(n.checked_add(1)?)?;
        self.items.get(index)
    }

    /// Drop `count` items directly below the top, keeping the top in place
    pub fn slide(&mut self, count: usize) -> bool {
        if count.checked_add(1).map_or(true, |needed| !self.has(needed)) {
            return false;
        }
        let top = self.items.len() - 1;
        self.items.drain(top - count..top);
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items from bottom to top
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Items from top to bottom
    pub fn iter_from_top(&self) -> impl Iterator<Item = &T> {
        self.items.iter().rev()
    }
}

impl<T: Clone> Stack<T> {
    /// Push a copy of the top item
    pub fn duplicate(&mut self) -> bool {
        match self.items.last().cloned() {
            Some(top) => {
                self.items.push(top);
                true
            }
            None => false,
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(values: &[i64]) -> Stack<i64> {
        let mut stack = Stack::new();
        for v in values {
            stack.push(*v);
        }
        stack
    }

    #[test]
    fn test_nth_from_top() {
        let stack = stack_of(&[1, 2, 3]);
        assert_eq!(stack.nth_from_top(0), Some(&3));
        assert_eq!(stack.nth_from_top(2), Some(&1));
        assert_eq!(stack.nth_from_top(3), None);
        assert_eq!(stack.nth_from_top(usize::MAX), None);
    }

    #[test]
    fn test_slide_keeps_top() {
        let mut stack = stack_of(&[1, 2, 3, 4]);
        assert!(stack.slide(2));
        assert_eq!(stack.as_slice(), &[1, 4]);
    }

    #[test]
    fn test_slide_needs_count_plus_one_items() {
        let mut stack = stack_of(&[1, 2]);
        assert!(!stack.slide(2));
        assert_eq!(stack.len(), 2);
        assert!(stack.slide(1));
        assert_eq!(stack.as_slice(), &[2]);
        assert!(!stack.slide(usize::MAX));
    }

    #[test]
    fn test_replace_top() {
        let mut stack = stack_of(&[5]);
        assert_eq!(stack.replace_top(9), Some(5));
        assert_eq!(stack.top(), Some(&9));
        let mut empty: Stack<i64> = Stack::new();
        assert_eq!(empty.replace_top(1), None);
    }
}
