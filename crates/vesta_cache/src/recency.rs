//! Bounded least-recently-used map.
//!
//! Entries live in a slab of nodes linked into a doubly linked recency list,
//! with a hash index from key to slot. Promotion, insertion and eviction are
//! all O(1).

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Sentinel slot index meaning "no node".
const NIL: usize = usize::MAX;

struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// A fixed-capacity key-value store that evicts the least recently used entry.
///
/// [`get`](Self::get) and [`set`](Self::set) promote the entry to most recent.
/// [`has_key`](Self::has_key) probes without touching the order. Capacity is
/// fixed at construction.
pub struct RecencyCache<K, V> {
    capacity: usize,
    index: HashMap<K, usize>,
    slots: Vec<Node<K, V>>,
    head: usize,
    tail: usize,
}

impl<K, V> RecencyCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Storage grows with the entries actually inserted.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "recency cache capacity must be at least 1");
        Self {
            capacity,
            index: HashMap::new(),
            slots: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `key` is present, without promoting it.
    pub fn has_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.promote(slot);
        Some(&self.slots[slot].value)
    }

    /// Inserts or overwrites `key`, marks it most recently used, and evicts
    /// the least recently used entry if the cache is over capacity.
    ///
    /// Returns the evicted entry, if any.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&slot) = self.index.get(&key) {
            self.slots[slot].value = value;
            self.promote(slot);
            return None;
        }

        if self.index.len() < self.capacity {
            let slot = self.slots.len();
            self.slots.push(Node {
                key: key.clone(),
                value,
                prev: NIL,
                next: NIL,
            });
            self.index.insert(key, slot);
            self.push_front(slot);
            return None;
        }

        // Full: reuse the tail slot for the new entry.
        let slot = self.tail;
        self.unlink(slot);
        let node = &mut self.slots[slot];
        let old_key = std::mem::replace(&mut node.key, key.clone());
        let old_value = std::mem::replace(&mut node.value, value);
        self.index.remove(&old_key);
        self.index.insert(key, slot);
        self.push_front(slot);
        Some((old_key, old_value))
    }

    /// Returns the keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while cursor != NIL {
            let node = &self.slots[cursor];
            keys.push(node.key.clone());
            cursor = node.next;
        }
        keys
    }

    fn promote(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = &self.slots[slot];
            (node.prev, node.next)
        };
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }
        let node = &mut self.slots[slot];
        node.prev = NIL;
        node.next = NIL;
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = &mut self.slots[slot];
            node.prev = NIL;
            node.next = old_head;
        }
        if old_head == NIL {
            self.tail = slot;
        } else {
            self.slots[old_head].prev = slot;
        }
        self.head = slot;
    }
}

impl<K, V> fmt::Debug for RecencyCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyCache")
            .field("capacity", &self.capacity)
            .field("keys", &self.keys())
            .finish()
    }
}
