//! Bounded recency cache for expensive-to-recompute document metadata
//!
//! The engine memoizes page counts through this cache. Entries never expire
//! on their own and there is no invalidation tied to file modification; use
//! [`LruCache::remove`] when staleness matters.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Generic least-recently-used cache with a fixed capacity.
///
/// The recency queue keeps the most-recently-touched key at the back, so
/// eviction always pops from the front. Ties between untouched entries fall
/// back to insertion order.
pub struct LruCache<K: Clone + Eq + Hash, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    recency: VecDeque<K>,
}

impl<K: Clone + Eq + Hash, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries (clamped to 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            recency: VecDeque::with_capacity(capacity),
        }
    }

    /// Look up a key, marking it most-recently-used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.entries.get(key)
    }

    /// Insert or update a value, evicting the least-recently-used entry if
    /// the cache would otherwise exceed capacity.
    pub fn put(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            self.touch(&key);
        } else {
            if self.entries.len() >= self.capacity {
                if let Some(evicted) = self.recency.pop_front() {
                    self.entries.remove(&evicted);
                }
            }
            self.recency.push_back(key.clone());
        }
        self.entries.insert(key, value);
    }

    /// Drop a single entry, if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.recency.retain(|k| k != key);
        Some(value)
    }

    /// Empty the cache.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, key: &K) {
        self.recency.retain(|k| k != key);
        self.recency.push_back(key.clone());
    }
}
