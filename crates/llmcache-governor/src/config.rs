//! Configuration for the resource governor.

use std::time::Duration;

/// Utilisation fraction above which the monitor emits a warning event.
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.8;

/// Hard limits and monitor cadence for a [`crate::Governor`].
#[derive(Debug, Clone)]
pub struct GovernorConfig {
    pub memory_limit_bytes: u64,
    pub task_limit: u64,
    pub handle_limit: u64,
    /// How often the background monitor samples utilisation. `None` disables
    /// the monitor entirely.
    pub monitor_interval: Option<Duration>,
    /// Utilisation fraction (0.0-1.0) above which a warning event fires.
    pub warning_threshold: f64,
    pub name: String,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            memory_limit_bytes: 512 * 1024 * 1024,
            task_limit: 256,
            handle_limit: 1024,
            monitor_interval: Some(Duration::from_secs(10)),
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            name: "default".to_string(),
        }
    }
}

impl GovernorConfig {
    pub fn builder() -> GovernorConfigBuilder {
        GovernorConfigBuilder::default()
    }
}

/// Builder for [`GovernorConfig`].
#[derive(Debug, Clone, Default)]
pub struct GovernorConfigBuilder {
    memory_limit_bytes: Option<u64>,
    task_limit: Option<u64>,
    handle_limit: Option<u64>,
    monitor_interval: Option<Duration>,
    warning_threshold: Option<f64>,
    name: Option<String>,
}

impl GovernorConfigBuilder {
    pub fn memory_limit_bytes(mut self, limit: u64) -> Self {
        self.memory_limit_bytes = Some(limit);
        self
    }

    pub fn task_limit(mut self, limit: u64) -> Self {
        self.task_limit = Some(limit);
        self
    }

    pub fn handle_limit(mut self, limit: u64) -> Self {
        self.handle_limit = Some(limit);
        self
    }

    pub fn monitor_interval(mut self, interval: Option<Duration>) -> Self {
        self.monitor_interval = interval;
        self
    }

    pub fn warning_threshold(mut self, threshold: f64) -> Self {
        self.warning_threshold = Some(threshold);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the config. Panics if `warning_threshold` is outside `[0.0, 1.0]`,
    /// matching the panicking-builder convention used across this workspace.
    pub fn build(self) -> GovernorConfig {
        let defaults = GovernorConfig::default();
        let threshold = self.warning_threshold.unwrap_or(defaults.warning_threshold);
        assert!(
            (0.0..=1.0).contains(&threshold),
            "warning_threshold must be in [0.0, 1.0], got {threshold}"
        );

        GovernorConfig {
            memory_limit_bytes: self.memory_limit_bytes.unwrap_or(defaults.memory_limit_bytes),
            task_limit: self.task_limit.unwrap_or(defaults.task_limit),
            handle_limit: self.handle_limit.unwrap_or(defaults.handle_limit),
            monitor_interval: self.monitor_interval.or(defaults.monitor_interval),
            warning_threshold: threshold,
            name: self.name.unwrap_or(defaults.name),
        }
    }
}
