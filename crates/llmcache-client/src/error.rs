//! The resilient client's public error type, flattening the layered
//! `CircuitBreakerError<TimeLimiterError<BackendError>>` the tower stack
//! actually produces into the three outcomes spec §7 names for this
//! component: `CircuitOpen`, a timeout, or the backend's own error.

use llmcache_circuitbreaker::CircuitBreakerError;
use llmcache_core::BackendError;
use llmcache_timelimiter::TimeLimiterError;
use thiserror::Error;

/// The error type produced by the single wrapped attempt, before retry
/// classification: circuit-breaker rejection, wrapping a per-attempt
/// timeout, wrapping the backend's own error.
pub type AttemptError = CircuitBreakerError<TimeLimiterError<BackendError>>;

/// Errors surfaced by [`crate::ResilientClient`].
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The circuit breaker rejected the call without invoking the backend
    /// (spec §7 `CircuitOpen`). Never retried.
    #[error("circuit breaker '{name}' is open")]
    CircuitOpen { name: String },

    /// The per-attempt deadline elapsed before the backend responded.
    #[error("backend call exceeded timeout")]
    Timeout,

    /// The backend call completed but returned an error.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl ClientError {
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, ClientError::CircuitOpen { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout)
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, ClientError::Backend(_))
    }

    pub(crate) fn from_attempt(name: &str, err: AttemptError) -> Self {
        match err {
            CircuitBreakerError::OpenCircuit => ClientError::CircuitOpen { name: name.to_string() },
            CircuitBreakerError::Inner(TimeLimiterError::Timeout) => ClientError::Timeout,
            CircuitBreakerError::Inner(TimeLimiterError::Inner(backend_err)) => {
                ClientError::Backend(backend_err)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
