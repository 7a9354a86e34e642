//! Collection types shared by the scanner's match index.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// A multimap that stores multiple values per key, in insertion order.
#[derive(Debug, Clone)]
pub struct MultiMap<K, V> {
    map: FxHashMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> MultiMap<K, V> {
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.map.entry(key).or_default().push(value);
    }

    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.map.get(key).map(|v| v.as_slice())
    }

    /// Total number of values across all keys.
    pub fn value_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// Sort every value group in place with a stable sort.
    pub fn sort_groups_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&V, &V) -> std::cmp::Ordering,
    {
        for group in self.map.values_mut() {
            group.sort_by(&mut compare);
        }
    }
}

impl<K: Eq + Hash, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A set that uses FxHash; the index is keyed by chars, where DoS resistance is not needed.
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;
