//! Construction parameters for [`crate::Dispatcher`]'s three pools
//! (`pool.<name>.*` in spec §6), sized to their workloads per §4.10:
//! remote-model (low concurrency, long timeout), local (higher concurrency,
//! short timeout), cache (medium concurrency, very short timeout).

use llmcache_client::ClientConfig;
use llmcache_pool::PoolConfig;
use std::time::Duration;

/// Priority a [`crate::Dispatcher`] assigns work submitted through each
/// entry point (§4.10: remote medium, local low, cache lowest).
pub mod priority {
    pub const REMOTE: i32 = 50;
    pub const LOCAL: i32 = 20;
    pub const CACHE: i32 = 0;
}

/// Construction parameters for [`crate::Dispatcher`].
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub remote_pool: PoolConfig,
    pub local_pool: PoolConfig,
    pub cache_pool: PoolConfig,
    /// Applied to every [`llmcache_client::ResilientClient`] the dispatcher
    /// builds on first use of a given backend id.
    pub client: ClientConfig,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            remote_pool: PoolConfig {
                worker_count: 4,
                queue_size: 64,
                default_timeout: Duration::from_secs(60),
                enable_stats: true,
                name: "remote-model".to_string(),
            },
            local_pool: PoolConfig {
                worker_count: 8,
                queue_size: 256,
                default_timeout: Duration::from_secs(5),
                enable_stats: true,
                name: "local".to_string(),
            },
            cache_pool: PoolConfig {
                worker_count: 6,
                queue_size: 512,
                default_timeout: Duration::from_millis(500),
                enable_stats: true,
                name: "cache".to_string(),
            },
            client: ClientConfig::default(),
        }
    }
}

/// Builder for [`DispatcherConfig`].
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfigBuilder {
    config: DispatcherConfig,
}

impl DispatcherConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remote_pool(mut self, pool: PoolConfig) -> Self {
        self.config.remote_pool = pool;
        self
    }

    pub fn local_pool(mut self, pool: PoolConfig) -> Self {
        self.config.local_pool = pool;
        self
    }

    pub fn cache_pool(mut self, pool: PoolConfig) -> Self {
        self.config.cache_pool = pool;
        self
    }

    pub fn client(mut self, client: ClientConfig) -> Self {
        self.config.client = client;
        self
    }

    pub fn build(self) -> DispatcherConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_size_pools_per_workload() {
        let config = DispatcherConfig::default();
        assert!(config.remote_pool.default_timeout > config.local_pool.default_timeout);
        assert!(config.local_pool.default_timeout > config.cache_pool.default_timeout);
        assert!(config.local_pool.worker_count > config.remote_pool.worker_count);
    }

    #[test]
    fn builder_overrides_individual_pools() {
        let config = DispatcherConfigBuilder::new()
            .cache_pool(PoolConfig {
                worker_count: 1,
                queue_size: 1,
                default_timeout: Duration::from_millis(1),
                enable_stats: false,
                name: "cache".to_string(),
            })
            .build();
        assert_eq!(config.cache_pool.worker_count, 1);
        assert_eq!(config.remote_pool.worker_count, DispatcherConfig::default().remote_pool.worker_count);
    }
}
