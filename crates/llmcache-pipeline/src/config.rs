//! Configuration for a [`crate::Pipeline`] and its stages (§6 knobs).

use std::time::Duration;

/// Fixed concurrency ceiling for `Pipeline::process_batch` (§4.9).
pub const BATCH_CONCURRENCY: usize = 10;

/// Whether a stage runs inline under a timeout, or is submitted to its own
/// worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Serial,
    Parallel,
}

/// Construction parameters for one pipeline stage.
#[derive(Debug, Clone)]
pub struct StageConfig {
    pub(crate) name: String,
    pub(crate) kind: StageKind,
    pub(crate) timeout: Duration,
    /// Worker count backing a `Parallel` stage's pool. Unused for `Serial`.
    pub(crate) pool_workers: usize,
    pub(crate) pool_queue_size: usize,
}

impl StageConfig {
    pub fn serial(name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::Serial,
            timeout,
            pool_workers: 0,
            pool_queue_size: 0,
        }
    }

    pub fn parallel(name: impl Into<String>, timeout: Duration, pool_workers: usize, pool_queue_size: usize) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::Parallel,
            timeout,
            pool_workers: pool_workers.max(1),
            pool_queue_size: pool_queue_size.max(1),
        }
    }
}

/// Pipeline-level configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub(crate) name: String,
    pub(crate) batch_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "pipeline".to_string(),
            batch_concurrency: BATCH_CONCURRENCY,
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Overrides the default batch concurrency ceiling of 10 (§4.9).
    pub fn batch_concurrency(mut self, n: usize) -> Self {
        self.config.batch_concurrency = n.max(1);
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
