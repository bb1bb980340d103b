#![cfg_attr(nightly, feature(no_coverage))]

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

mod cache;
pub use cache::{Cache, Displaced, Lru};

pub mod config;

mod error;
pub use error::Error;

mod list;

mod sharded;
pub use sharded::ShardedCache;

pub(crate) fn calculate_hash<T>(t: &T) -> u64
where
    T: Hash + ?Sized,
{
    let mut hasher = DefaultHasher::new();
    t.hash(&mut hasher);
    hasher.finish()
}
