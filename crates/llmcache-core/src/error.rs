//! Common error type shared by the resource governor, resilient client, worker
//! pool and pipeline.
//!
//! Composing several of those layers around one application service normally
//! means writing a `From<LayerError>` impl for every layer you stack. Using
//! [`CoreError<E>`] as the composed service's error type removes that
//! boilerplate: every layer converts its own error into the matching variant,
//! and the `Application(E)` variant carries through whatever the innermost
//! call produced.
//!
//! ```
//! use llmcache_core::CoreError;
//!
//! #[derive(Debug, Clone)]
//! enum BackendError {
//!     Unavailable,
//! }
//!
//! impl std::fmt::Display for BackendError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "backend unavailable")
//!     }
//! }
//!
//! impl std::error::Error for BackendError {}
//!
//! type DispatchError = CoreError<BackendError>;
//! ```

use std::fmt;
use std::time::Duration;

/// A unified error type for the layers this crate's sibling crates stack
/// around an application service.
///
/// `E` is the application-specific error produced by the innermost call
/// (typically a `Backend` error, see the manager/dispatcher crates).
#[derive(Debug, Clone)]
pub enum CoreError<E> {
    /// A deadline elapsed before the call completed (pool timeout, pipeline
    /// stage timeout, task-group timeout, retry wait).
    Timeout {
        /// Name of the layer that observed the timeout (e.g. `"worker_pool"`).
        layer: &'static str,
    },

    /// The circuit breaker rejected the call without invoking the backend.
    CircuitOpen {
        /// Circuit breaker name, if configured.
        name: Option<String>,
    },

    /// The resource governor denied an `acquire` because the quota is
    /// exhausted.
    OverLimit {
        /// Which quota was over limit (`"memory"`, `"tasks"`, `"handles"`).
        kind: &'static str,
        /// The configured hard limit.
        limit: u64,
    },

    /// A worker-pool queue rejected `submit` because it is full.
    QueueFull {
        /// Pool name.
        pool: String,
    },

    /// The call's context was cancelled or its deadline passed before
    /// completion; no cache writes or other side effects occurred.
    Cancelled,

    /// The underlying application call returned an error.
    Application(E),
}

impl<E> fmt::Display for CoreError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Timeout { layer } => write!(f, "timeout in {layer}"),
            CoreError::CircuitOpen { name } => match name {
                Some(n) => write!(f, "circuit breaker '{n}' is open"),
                None => write!(f, "circuit breaker is open"),
            },
            CoreError::OverLimit { kind, limit } => {
                write!(f, "resource governor: {kind} over limit ({limit})")
            }
            CoreError::QueueFull { pool } => write!(f, "worker pool '{pool}' queue is full"),
            CoreError::Cancelled => write!(f, "operation cancelled"),
            CoreError::Application(e) => write!(f, "application error: {e}"),
        }
    }
}

impl<E> std::error::Error for CoreError<E> where E: std::error::Error {}

impl<E> CoreError<E> {
    /// `true` for [`CoreError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::Timeout { .. })
    }

    /// `true` for [`CoreError::CircuitOpen`].
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, CoreError::CircuitOpen { .. })
    }

    /// `true` for [`CoreError::OverLimit`].
    pub fn is_over_limit(&self) -> bool {
        matches!(self, CoreError::OverLimit { .. })
    }

    /// `true` for [`CoreError::QueueFull`].
    pub fn is_queue_full(&self) -> bool {
        matches!(self, CoreError::QueueFull { .. })
    }

    /// `true` for [`CoreError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::Cancelled)
    }

    /// `true` for [`CoreError::Application`].
    pub fn is_application(&self) -> bool {
        matches!(self, CoreError::Application(_))
    }

    /// Extracts the application error, if this is an `Application` variant.
    pub fn application_error(self) -> Option<E> {
        match self {
            CoreError::Application(e) => Some(e),
            _ => None,
        }
    }

    /// Maps the application error using a function, leaving other variants
    /// unchanged.
    pub fn map_application<F, T>(self, f: F) -> CoreError<T>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            CoreError::Timeout { layer } => CoreError::Timeout { layer },
            CoreError::CircuitOpen { name } => CoreError::CircuitOpen { name },
            CoreError::OverLimit { kind, limit } => CoreError::OverLimit { kind, limit },
            CoreError::QueueFull { pool } => CoreError::QueueFull { pool },
            CoreError::Cancelled => CoreError::Cancelled,
            CoreError::Application(e) => CoreError::Application(f(e)),
        }
    }
}

/// Whether a raw duration exceeded a configured ceiling; used by retry/backoff
/// callers that need to cap a wait without importing `tokio::time`.
pub fn capped(wait: Duration, ceiling: Duration) -> Duration {
    if wait > ceiling { ceiling } else { wait }
}
