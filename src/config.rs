use crate::Error;

fn default_shards() -> usize {
    1
}

/// Sizing for a [`crate::Cache`] or [`crate::ShardedCache`].
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// Maximum number of live entries.
    pub capacity: usize,
    /// Number of independently locked partitions. Only read by
    /// [`crate::ShardedCache`].
    #[serde(default = "default_shards")]
    pub shards: usize,
}

impl Config {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            shards: default_shards(),
        }
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        let Self { capacity, shards } = *self;

        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        if shards == 0 || shards > capacity {
            return Err(Error::InvalidShardCount { shards, capacity });
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use coverage_helper::test;
    use matches::assert_matches;
    use test_case::test_case;

    use crate::Error;

    use super::Config;

    #[test]
    fn test_deserialize_defaults_shards() {
        let config: Config = serde_json::from_str(r#"{"capacity": 128}"#).expect("config");
        assert_eq!(config, Config::new(128));
        assert_eq!(config.shards, 1);
    }

    #[test]
    fn test_deserialize_with_shards() {
        let config: Config =
            serde_json::from_str(r#"{"capacity": 128, "shards": 8}"#).expect("config");
        assert_eq!(config, Config::new(128).with_shards(8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity() {
        assert_matches!(Config::new(0).validate(), Err(Error::InvalidCapacity(0)));
    }

    #[test_case(4, 0 ; "no shards")]
    #[test_case(4, 5 ; "more shards than capacity")]
    fn test_invalid_shards(capacity: usize, shards: usize) {
        let result = Config::new(capacity).with_shards(shards).validate();
        assert_matches!(
            result,
            Err(Error::InvalidShardCount { shards: s, capacity: c }) if s == shards && c == capacity
        );
    }

    #[test_case(1, 1)]
    #[test_case(4, 4)]
    #[test_case(1024, 16)]
    fn test_valid(capacity: usize, shards: usize) {
        assert!(Config::new(capacity).with_shards(shards).validate().is_ok());
    }
}
