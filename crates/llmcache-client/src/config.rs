//! Configuration knobs for [`crate::ResilientClient`], named after spec §6's
//! `retry.*` / `breaker.*` configuration keys rather than the lower-level
//! rate/window vocabulary the underlying circuit-breaker crate uses.

use std::time::Duration;

/// Construction parameters for a [`crate::ResilientClient`].
///
/// `failure_threshold` and `min_requests` are the spec's count-based breaker
/// knobs; internally they are translated into the dependency stack's
/// rate-based [`llmcache_circuitbreaker::CircuitBreakerConfigBuilder`] by
/// setting `sliding_window_size = min_requests` and
/// `failure_rate_threshold = failure_threshold / min_requests`, so the
/// breaker opens at exactly the sample spec describes once `min_requests`
/// calls have been observed.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub name: String,
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub jitter_ratio: f64,
    pub failure_threshold: usize,
    pub min_requests: usize,
    pub open_duration: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "backend".to_string(),
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            jitter_ratio: 0.25,
            failure_threshold: 5,
            min_requests: 10,
            open_duration: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn max_attempts(mut self, n: usize) -> Self {
        self.config.max_attempts = n.max(1);
        self
    }

    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.config.initial_delay = d;
        self
    }

    pub fn max_delay(mut self, d: Duration) -> Self {
        self.config.max_delay = d;
        self
    }

    pub fn jitter_ratio(mut self, r: f64) -> Self {
        self.config.jitter_ratio = r.clamp(0.0, 1.0);
        self
    }

    pub fn failure_threshold(mut self, n: usize) -> Self {
        self.config.failure_threshold = n;
        self
    }

    pub fn min_requests(mut self, n: usize) -> Self {
        self.config.min_requests = n.max(1);
        self
    }

    pub fn open_duration(mut self, d: Duration) -> Self {
        self.config.open_duration = d;
        self
    }

    pub fn request_timeout(mut self, d: Duration) -> Self {
        self.config.request_timeout = d;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
