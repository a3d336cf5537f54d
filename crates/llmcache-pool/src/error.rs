//! Errors returned by worker pool operations.

use thiserror::Error;

/// Errors surfaced by [`crate::WorkerPool`] and [`crate::PriorityWorkerPool`].
#[derive(Debug, Clone, Error)]
pub enum PoolError {
    /// The task queue was full and the caller chose not to wait.
    #[error("pool '{pool}' queue is full")]
    QueueFull { pool: String },

    /// `submit_with_timeout` waited its full duration without enqueuing.
    #[error("timed out enqueuing onto pool '{pool}'")]
    EnqueueTimeout { pool: String },

    /// The pool has been shut down and no longer accepts work.
    #[error("pool '{pool}' is shut down")]
    Closed { pool: String },
}

pub type Result<T> = std::result::Result<T, PoolError>;

/// Lets a task's error type represent a worker's hard-deadline timeout, so
/// `default_timeout` expiry can still invoke the task's `callback` (§4.8)
/// instead of silently dropping the completion sink.
pub trait TimeoutError {
    fn timed_out() -> Self;
}

impl TimeoutError for () {
    fn timed_out() {}
}

impl TimeoutError for &'static str {
    fn timed_out() -> Self {
        "task timed out"
    }
}
