//! Lazy Min-Heap Module
//!
//! Tracks the smallest live priority or expiry without arbitrary deletion.
//!
//! ```text
//!   push(5), push(3), push(5)      heap: [3, 5]   present: {3, 5}
//!                                                 (second 5 skipped)
//!   bucket 3 drains to empty       heap: [3, 5]   3 is now STALE
//!   drain_stale(is_live)           heap: [5]      present: {5}
//! ```

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::hash::Hash;

// == Lazy Min Heap ==
/// Binary min-heap paired with a presence set.
///
/// A value is pushed at most once while present. Values whose bucket has
/// emptied stay in the heap until [`LazyMinHeap::drain_stale`] reaches
/// them at the top.
#[derive(Debug)]
pub struct LazyMinHeap<T> {
    heap: BinaryHeap<Reverse<T>>,
    present: HashSet<T>,
}

impl<T> Default for LazyMinHeap<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            present: HashSet::new(),
        }
    }
}

impl<T: Ord + Hash + Clone> LazyMinHeap<T> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Pushes `value` unless it is already present. Returns `true` if pushed.
    pub fn push(&mut self, value: T) -> bool {
        if self.present.contains(&value) {
            return false;
        }
        self.present.insert(value.clone());
        self.heap.push(Reverse(value));
        true
    }

    // == Peek ==
    /// Returns the smallest value, which may be stale until drained.
    pub fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|Reverse(value)| value)
    }

    // == Drain Stale ==
    /// Pops heap heads for which `is_live` returns `false`, clearing their
    /// presence. Stops at the first live head and returns the dropped values.
    pub fn drain_stale<F>(&mut self, mut is_live: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut dropped = Vec::new();
        while let Some(Reverse(top)) = self.heap.peek() {
            if is_live(top) {
                break;
            }
            if let Some(Reverse(value)) = self.heap.pop() {
                self.present.remove(&value);
                dropped.push(value);
            }
        }
        dropped
    }

    // == Is Present ==
    pub fn is_present(&self, value: &T) -> bool {
        self.present.contains(value)
    }

    // == Length ==
    /// Number of heap slots, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
