use std::{
    borrow::Borrow,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crossbeam::utils::CachePadded;
use log::debug;

use crate::{calculate_hash, config::Config, Error, Lru};

type Shard<K, V> = CachePadded<Mutex<Lru<K, V>>>;

/// LRU cache split into independently locked shards.
///
/// A key always maps to the same shard, picked by its hash. The capacity is
/// split across shards, the first `capacity % shards` getting one extra slot,
/// so the total never exceeds the configured capacity. Each shard is an exact
/// LRU over its own keys, so recency is only ordered within a shard. Callers
/// touching keys in different shards never wait on each other.
#[derive(Debug)]
pub struct ShardedCache<K, V> {
    shards: Arc<[Shard<K, V>]>,
}

impl<K, V> Clone for ShardedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            shards: Arc::clone(&self.shards),
        }
    }
}

impl<K, V> ShardedCache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize, shards: usize) -> Result<Self, Error> {
        Self::from_config(&Config::new(capacity).with_shards(shards))
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        config.validate()?;

        let Config { capacity, shards } = *config;
        let (base, extra) = (capacity / shards, capacity % shards);
        debug!("creating {shards} shards of {base}-{} entries", base + 1);

        // `shards <= capacity`, so every shard gets at least one slot.
        let shards = (0..shards)
            .map(|i| base + usize::from(i < extra))
            .map(|per_shard| Lru::new(per_shard).map(|lru| CachePadded::new(Mutex::new(lru))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            shards: shards.into(),
        })
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        V: Clone,
    {
        self.shard(key).get(key).cloned()
    }

    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        V: Clone,
    {
        self.shard(key).peek(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.shard(key).contains(key)
    }

    pub fn set(&self, key: K, value: V) {
        let displaced = self.shard(&key).set(key, value);
        drop(displaced);
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.shard(key).remove(key)
    }

    /// Sum of the shard sizes. Shards are locked one at a time, so this is
    /// not a snapshot while writers are active.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| lock(shard).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| lock(shard).is_empty())
    }

    /// Upper bound on live entries across all shards, equal to the
    /// configured capacity.
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(|shard| lock(shard).capacity()).sum()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn clear(&self) {
        for shard in self.shards.iter() {
            let drained = lock(shard).take();
            drop(drained);
        }
    }

    fn shard<Q>(&self, key: &Q) -> MutexGuard<'_, Lru<K, V>>
    where
        Q: Hash + ?Sized,
    {
        lock(&self.shards[self.shard_index(key)])
    }

    fn shard_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        // The remainder is below the shard count, which is a usize.
        (calculate_hash(key) % self.shards.len() as u64) as usize
    }
}

fn lock<K, V>(shard: &Shard<K, V>) -> MutexGuard<'_, Lru<K, V>> {
    shard.lock().unwrap_or_else(PoisonError::into_inner)
}
