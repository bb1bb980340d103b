#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid capacity: {0} must be > 0")]
    InvalidCapacity(usize),

    #[error("invalid shard count: {shards} must be > 0 and <= capacity ({capacity})")]
    InvalidShardCount { shards: usize, capacity: usize },
}
