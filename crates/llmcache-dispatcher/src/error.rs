//! Errors surfaced by [`crate::Dispatcher`].

use llmcache_cache::CacheError;
use llmcache_client::ClientError;
use llmcache_pool::{PoolError, TimeoutError};
use thiserror::Error;

/// Errors surfaced by [`crate::Dispatcher`] and [`crate::TaskGroup`].
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// The target pool's queue was full; the caller should back off (§7
    /// `QueueFull`).
    #[error("dispatcher pool '{pool}' queue is full")]
    QueueFull { pool: String },

    /// The resilient client rejected or failed the remote call.
    #[error("remote call failed: {0}")]
    Remote(#[from] ClientError),

    /// A cache-pool operation failed.
    #[error("cache operation failed: {0}")]
    Cache(#[from] CacheError),

    /// `process_cache(Set, ..)` was called without a value, or `Get`/`Delete`
    /// was called without the fields they need.
    #[error("cache operation '{op}' is missing a required argument: {what}")]
    InvalidCacheOp { op: &'static str, what: &'static str },

    /// The task group's deadline elapsed before every child callback fired.
    #[error("task group '{id}' timed out waiting for {remaining} of {total} tasks")]
    GroupTimeout {
        id: String,
        remaining: usize,
        total: usize,
    },

    /// A worker exceeded the pool's `default_timeout` running this task.
    #[error("task exceeded the pool's default timeout")]
    TaskTimeout,
}

impl From<PoolError> for DispatcherError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::QueueFull { pool } | PoolError::EnqueueTimeout { pool } | PoolError::Closed { pool } => {
                DispatcherError::QueueFull { pool }
            }
        }
    }
}

impl TimeoutError for DispatcherError {
    fn timed_out() -> Self {
        DispatcherError::TaskTimeout
    }
}

pub type Result<T> = std::result::Result<T, DispatcherError>;
