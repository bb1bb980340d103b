use std::{borrow::Borrow, collections::HashMap, hash::Hash, mem};

use log::{debug, trace};

use crate::{
    list::{Handle, List},
    Error,
};

/// What a [`Lru::set`] pushed out of the cache.
#[derive(Debug, Eq, PartialEq)]
pub enum Displaced<K, V> {
    /// Previous value of an overwritten key.
    Replaced(V),
    /// Least recently used entry, dropped to make room.
    Evicted(K, V),
}

/// Exact LRU map with a fixed capacity.
///
/// The index and the list always hold the same keys: every index entry
/// points at a live list entry with the same key, and nothing else is
/// linked. Not thread safe, see [`crate::Cache`] for that.
#[derive(Debug)]
pub struct Lru<K, V> {
    index: HashMap<K, Handle>,
    list: List<K, V>,
    capacity: usize,
}

impl<K, V> Lru<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        debug!("creating lru with capacity {capacity}");
        Ok(Self {
            // One extra slot for the transient entry before eviction.
            index: HashMap::with_capacity(capacity + 1),
            list: List::with_capacity(capacity + 1),
            capacity,
        })
    }

    /// Returns the value and marks the entry most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let handle = *self.index.get(key)?;
        self.list.promote_to_head(handle);
        trace!("promoted {handle:?} on read");
        self.list.get(handle).map(|entry| &entry.value)
    }

    /// Returns the value without touching the recency order.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let handle = *self.index.get(key)?;
        self.list.get(handle).map(|entry| &entry.value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Inserts or overwrites `key`, making it the most recently used entry.
    ///
    /// Whatever leaves the cache is handed back, so the caller decides where
    /// it gets dropped: the old value on overwrite, or the least recently used
    /// entry when a new key pushes the cache over capacity.
    pub fn set(&mut self, key: K, value: V) -> Option<Displaced<K, V>> {
        if let Some(&handle) = self.index.get(&key) {
            let old = self
                .list
                .get_mut(handle)
                .map(|entry| mem::replace(&mut entry.value, value));
            self.list.promote_to_head(handle);
            trace!("promoted {handle:?} on overwrite");
            return old.map(Displaced::Replaced);
        }

        let handle = self.list.insert_at_head(key.clone(), value);
        self.index.insert(key, handle);
        debug_assert_eq!(self.index.len(), self.list.len());

        // Only one entry was added, so one eviction restores the bound.
        if self.index.len() > self.capacity {
            self.evict()
        } else {
            None
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let handle = self.index.remove(key)?;
        self.list.remove(handle).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Empties the cache, returning the old entries with the same capacity.
    pub fn take(&mut self) -> Self {
        let empty = Self {
            index: HashMap::with_capacity(self.capacity + 1),
            list: List::with_capacity(self.capacity + 1),
            capacity: self.capacity,
        };
        mem::replace(self, empty)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|(key, _)| key)
    }

    fn evict(&mut self) -> Option<Displaced<K, V>> {
        let (key, value) = self.list.remove_tail()?;
        self.index.remove(&key);
        trace!("evicted lru entry, {} live", self.index.len());
        Some(Displaced::Evicted(key, value))
    }
}

#[cfg(test)]
impl<K, V> Lru<K, V>
where
    K: Clone + Eq + Hash + std::fmt::Debug,
{
    /// Panics unless the index and the list agree and the bound holds.
    pub(crate) fn assert_consistent(&self) {
        let keys = self.list.assert_consistent();
        assert!(keys.len() <= self.capacity);
        assert_eq!(keys.len(), self.index.len());
        for key in &keys {
            let handle = self.index.get(key).expect("listed key is indexed");
            assert_eq!(
                self.list.get(*handle).map(|entry| &entry.key),
                Some(key),
                "index points at the wrong entry"
            );
        }
    }
}
