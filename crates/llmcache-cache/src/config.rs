//! Configuration for the L1, L2 and layered cache tiers (§6 knobs).

use std::path::PathBuf;
use std::time::Duration;

/// L1 (in-process LRU) configuration.
///
/// `capacity == 0` disables L1 entirely: `MemoryCache::get`/`set` become
/// no-ops and every lookup falls straight through to L2.
#[derive(Debug, Clone)]
pub struct L1Config {
    pub(crate) capacity: usize,
    pub(crate) default_ttl: Duration,
    pub(crate) name: String,
}

impl Default for L1Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl: Duration::from_secs(300),
            name: "l1".to_string(),
        }
    }
}

/// Builder for [`L1Config`].
#[derive(Debug, Clone, Default)]
pub struct L1ConfigBuilder {
    config: L1Config,
}

impl L1ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry cap; `0` disables L1. Default: 1000.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Cap on any per-entry TTL admitted into L1. Default: 300s.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = ttl;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn build(self) -> L1Config {
        self.config
    }
}

/// L2 (persistent file-backed) configuration.
#[derive(Debug, Clone)]
pub struct L2Config {
    pub(crate) enabled: bool,
    pub(crate) max_entries: usize,
    pub(crate) default_ttl: Duration,
    pub(crate) max_ttl: Duration,
    pub(crate) cleanup_interval: Duration,
    pub(crate) cache_dir: PathBuf,
    pub(crate) max_file_size: usize,
    pub(crate) name: String,
}

impl Default for L2Config {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10_000,
            default_ttl: Duration::from_secs(3600),
            max_ttl: Duration::from_secs(7 * 24 * 3600),
            cleanup_interval: Duration::from_secs(600),
            cache_dir: PathBuf::from(".llmcache"),
            max_file_size: 1024 * 1024,
            name: "l2".to_string(),
        }
    }
}

/// Builder for [`L2Config`].
#[derive(Debug, Clone, Default)]
pub struct L2ConfigBuilder {
    config: L2Config,
}

impl L2ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = max_entries;
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = ttl;
        self
    }

    pub fn max_ttl(mut self, ttl: Duration) -> Self {
        self.config.max_ttl = ttl;
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.config.cleanup_interval = interval;
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    pub fn max_file_size(mut self, bytes: usize) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Builds the config.
    ///
    /// # Panics
    /// Panics if `default_ttl > max_ttl`, an internally inconsistent config.
    pub fn build(self) -> L2Config {
        assert!(
            self.config.default_ttl <= self.config.max_ttl,
            "L2Config: default_ttl must not exceed max_ttl"
        );
        self.config
    }
}

/// Layered-cache-level configuration: the write policy composing L1 over L2.
#[derive(Debug, Clone)]
pub struct LayeredCacheConfig {
    /// If true, `set` mirrors synchronously to L2. Write-back is declared in
    /// the design but collapses to write-through here (§9 open question).
    pub(crate) write_through: bool,
    pub(crate) name: String,
}

impl Default for LayeredCacheConfig {
    fn default() -> Self {
        Self {
            write_through: true,
            name: "layered".to_string(),
        }
    }
}

/// Builder for [`LayeredCacheConfig`].
#[derive(Debug, Clone, Default)]
pub struct LayeredCacheConfigBuilder {
    config: LayeredCacheConfig,
}

impl LayeredCacheConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_through(mut self, write_through: bool) -> Self {
        self.config.write_through = write_through;
        self
    }

    /// Alias kept for readers of the source design: write-back is
    /// documented but collapses to write-through (§9).
    pub fn write_back(self, write_back: bool) -> Self {
        self.write_through(write_back)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn build(self) -> LayeredCacheConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l1_capacity_zero_is_accepted_by_builder() {
        let config = L1ConfigBuilder::new().capacity(0).build();
        assert_eq!(config.capacity, 0);
    }

    #[test]
    #[should_panic(expected = "default_ttl must not exceed max_ttl")]
    fn l2_builder_panics_on_inconsistent_ttls() {
        L2ConfigBuilder::new()
            .default_ttl(Duration::from_secs(100))
            .max_ttl(Duration::from_secs(10))
            .build();
    }

    #[test]
    fn write_back_alias_sets_write_through() {
        let config = LayeredCacheConfigBuilder::new().write_back(true).build();
        assert!(config.write_through);
    }
}
