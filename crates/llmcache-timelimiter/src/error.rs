use thiserror::Error;

/// Errors returned by the `TimeLimiter` service.
#[derive(Debug, Clone, Error)]
pub enum TimeLimiterError<E> {
    /// The inner call did not complete within the configured timeout.
    #[error("call exceeded timeout")]
    Timeout,

    /// An error returned by the inner service before the timeout elapsed.
    #[error("inner service error: {0}")]
    Inner(E),
}

impl<E> TimeLimiterError<E> {
    /// Returns true if the error is a timeout rather than an inner failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TimeLimiterError::Timeout)
    }

    /// Returns the inner error if this is not a timeout.
    pub fn into_inner(self) -> Option<E> {
        match self {
            TimeLimiterError::Inner(e) => Some(e),
            TimeLimiterError::Timeout => None,
        }
    }
}
