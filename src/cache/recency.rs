//! Recency List Module
//!
//! Ordered key set backing a single priority bucket.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

const SENTINEL: usize = usize::MAX;

#[derive(Debug)]
struct Node<K> {
    /// `None` while the slot sits on the free list
    key: Option<K>,
    prev: usize,
    next: usize,
}

// == Recency List ==
/// Keys ordered by last touch.
///
/// Nodes live in an arena linked by index:
/// - Front = Least recently used
/// - Back = Most recently used
///
/// Append, removal, move-to-back and front lookup are all O(1).
#[derive(Debug)]
pub struct RecencyList<K> {
    slots: Vec<Node<K>>,
    index: HashMap<K, usize>,
    head: usize,
    tail: usize,
    free_head: usize,
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            head: SENTINEL,
            tail: SENTINEL,
            free_head: SENTINEL,
        }
    }
}

impl<K: Eq + Hash + Clone> RecencyList<K> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Back ==
    /// Appends `key` as most recently used.
    ///
    /// A key already present is moved to the back instead. Returns `true`
    /// if the key was newly inserted.
    pub fn push_back(&mut self, key: K) -> bool {
        if let Some(&idx) = self.index.get(&key) {
            self.move_to_back(idx);
            return false;
        }
        let idx = self.alloc_slot(key.clone());
        self.link_back(idx);
        self.index.insert(key, idx);
        true
    }

    // == Touch ==
    /// Marks a key as most recently used. Returns `false` if absent.
    pub fn touch<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(&idx) => {
                self.move_to_back(idx);
                true
            }
            None => false,
        }
    }

    // == Remove ==
    /// Removes a key. Returns `false` if absent.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(idx) = self.index.remove(key) else {
            return false;
        };
        self.unlink(idx);
        self.slots[idx].key = None;
        self.slots[idx].next = self.free_head;
        self.free_head = idx;
        true
    }

    // == Front ==
    /// Returns the least recently used key without removing it.
    pub fn front(&self) -> Option<&K> {
        if self.head == SENTINEL {
            return None;
        }
        self.slots[self.head].key.as_ref()
    }

    // == Length ==
    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Iter ==
    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn alloc_slot(&mut self, key: K) -> usize {
        if self.free_head != SENTINEL {
            let idx = self.free_head;
            self.free_head = self.slots[idx].next;
            self.slots[idx] = Node {
                key: Some(key),
                prev: SENTINEL,
                next: SENTINEL,
            };
            idx
        } else {
            self.slots.push(Node {
                key: Some(key),
                prev: SENTINEL,
                next: SENTINEL,
            });
            self.slots.len() - 1
        }
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;

        if prev != SENTINEL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }

        if next != SENTINEL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.slots[idx].prev = SENTINEL;
        self.slots[idx].next = SENTINEL;
    }

    fn link_back(&mut self, idx: usize) {
        self.slots[idx].prev = self.tail;
        self.slots[idx].next = SENTINEL;

        if self.tail != SENTINEL {
            self.slots[self.tail].next = idx;
        } else {
            self.head = idx;
        }
        self.tail = idx;
    }

    fn move_to_back(&mut self, idx: usize) {
        if idx == self.tail {
            return;
        }
        self.unlink(idx);
        self.link_back(idx);
    }
}

/// Iterator over a [`RecencyList`], oldest first.
pub struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    current: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == SENTINEL {
            return None;
        }
        let node = &self.list.slots[self.current];
        self.current = node.next;
        node.key.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.list.index.len()))
    }
}
