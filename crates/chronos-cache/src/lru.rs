//! Bounded least-recently-used map.
//!
//! Nodes live in a slab (`Vec<Option<Node>>`) linked into a recency list by
//! index; freed slots are recycled through a free list. The head of the list
//! is the eviction candidate, the tail the most recently touched entry.

use std::fmt;
use std::hash::Hash;

use chronos_core::errors::{ChronosResult, TemporalError};
use rustc_hash::FxHashMap;
use tracing::trace;

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

pub struct LruCache<K, V> {
    index: FxHashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Fails on a zero capacity.
    pub fn new(capacity: usize) -> ChronosResult<Self> {
        if capacity == 0 {
            return Err(TemporalError::InvalidArgument(
                "LRU capacity must be positive".to_string(),
            )
            .into());
        }
        Ok(Self {
            index: FxHashMap::default(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Look `key` up and mark it most recently used. A repeated lookup of
    /// the most recent key is answered from the tail without hashing.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let at_tail = self
            .tail
            .and_then(|t| self.node(t))
            .is_some_and(|n| n.key == *key);
        if at_tail {
            return self.tail.and_then(|t| self.node(t)).map(|n| &n.value);
        }
        let idx = *self.index.get(key)?;
        if self.tail != Some(idx) {
            self.unlink(idx);
            self.push_back(idx);
        }
        self.node(idx).map(|n| &n.value)
    }

    /// Look `key` up without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.node(idx).map(|n| &n.value)
    }

    /// Insert or replace; returns the replaced value. Inserting a new key
    /// into a full cache evicts the least recently used entry.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(idx) = self.index.get(&key).copied() {
            let previous = self
                .node_mut(idx)
                .map(|n| std::mem::replace(&mut n.value, value));
            if self.tail != Some(idx) {
                self.unlink(idx);
                self.push_back(idx);
            }
            return previous;
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, idx);
        self.push_back(idx);

        if self.index.len() > self.capacity {
            self.pop_lru();
            trace!(capacity = self.capacity, "lru eviction");
        }
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        Some(node.value)
    }

    /// Evict and return the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let idx = self.head?;
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.index.remove(&node.key);
        self.free.push(idx);
        Some((node.key, node.value))
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.node(cursor?)?;
            cursor = node.next;
            Some(&node.key)
        })
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn unlink(&mut self, idx: usize) {
        let Some(node) = self.node_mut(idx) else {
            return;
        };
        let (prev, next) = (node.prev.take(), node.next.take());
        match prev {
            Some(p) => {
                if let Some(n) = self.node_mut(p) {
                    n.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn push_back(&mut self, idx: usize) {
        let tail = self.tail;
        if let Some(node) = self.node_mut(idx) {
            node.prev = tail;
            node.next = None;
        }
        match tail {
            Some(t) => {
                if let Some(node) = self.node_mut(t) {
                    node.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.keys().filter_map(|k| self.peek(k).map(|v| (k, v))))
            .finish()
    }
}
