//! Errors produced while running a [`crate::Pipeline`].

use llmcache_pool::PoolError;
use thiserror::Error;

/// Errors a pipeline stage (or the pipeline itself) can surface.
#[derive(Debug, Clone, Error)]
pub enum PipelineError<E> {
    /// A stage's own work returned an error.
    #[error("stage '{stage}' failed: {source}")]
    Stage { stage: String, source: E },

    /// A stage did not complete within its configured timeout.
    #[error("stage '{stage}' exceeded its timeout")]
    StageTimeout { stage: String },

    /// A parallel stage's backing worker pool rejected or lost the task.
    #[error("stage '{stage}' pool error: {source}")]
    Pool { stage: String, source: PoolError },

    /// The pipeline has no stages configured.
    #[error("pipeline has no stages")]
    Empty,
}

impl<E> PipelineError<E> {
    pub fn stage_name(&self) -> &str {
        match self {
            PipelineError::Stage { stage, .. } => stage,
            PipelineError::StageTimeout { stage } => stage,
            PipelineError::Pool { stage, .. } => stage,
            PipelineError::Empty => "",
        }
    }
}

pub type Result<T, E> = std::result::Result<T, PipelineError<E>>;
