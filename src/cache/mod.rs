use std::{
    borrow::Borrow,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{config::Config, Error};

mod lru;
pub use lru::{Displaced, Lru};

/// Thread safe LRU cache.
///
/// The index and the recency list sit behind a single mutex. Reads take it
/// exclusively too, since a hit reorders the list. Clones share the same
/// entries.
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: Arc<Mutex<Lru<K, V>>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Ok(Self {
            inner: Arc::new(Mutex::new(Lru::new(capacity)?)),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        config.validate()?;
        Self::new(config.capacity)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        V: Clone,
    {
        self.lock().peek(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.lock().contains(key)
    }

    pub fn set(&self, key: K, value: V) {
        // Dropped after the guard is released.
        let displaced = self.lock().set(key, value);
        drop(displaced);
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn clear(&self) {
        let drained = self.lock().take();
        drop(drained);
    }

    /// Keys from most to least recently used, as of one instant.
    pub fn keys(&self) -> Vec<K> {
        self.lock().keys().cloned().collect()
    }

    // Values are never dropped under the lock, and key hashing, comparison and
    // cloning must not panic, so a poisoned lock still guards a consistent
    // structure.
    fn lock(&self) -> MutexGuard<'_, Lru<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
