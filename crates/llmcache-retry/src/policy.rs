use crate::backoff::IntervalFunction;
use std::sync::Arc;
use std::time::Duration;

/// A predicate deciding whether a given error should be retried.
///
/// Defaults to "retry everything" when unset; set via
/// [`RetryConfigBuilder::retry_on`](crate::RetryConfigBuilder::retry_on) to
/// exclude non-retryable errors (e.g. validation failures) from the retry loop.
pub type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Combines a backoff interval function with an optional retry predicate.
pub struct RetryPolicy<E> {
    interval_fn: Arc<dyn IntervalFunction>,
    pub(crate) retry_predicate: Option<RetryPredicate<E>>,
}

impl<E> RetryPolicy<E> {
    pub fn new(interval_fn: Arc<dyn IntervalFunction>) -> Self {
        Self {
            interval_fn,
            retry_predicate: None,
        }
    }

    /// Returns whether the given error should trigger a retry attempt.
    pub fn should_retry(&self, err: &E) -> bool {
        match &self.retry_predicate {
            Some(predicate) => predicate(err),
            None => true,
        }
    }

    /// Returns the delay to wait before the next attempt.
    pub fn next_backoff(&self, attempt: usize) -> Duration {
        self.interval_fn.next_interval(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::FixedInterval;

    #[test]
    fn should_retry_defaults_to_true() {
        let policy: RetryPolicy<&str> = RetryPolicy::new(Arc::new(FixedInterval::new(Duration::from_millis(10))));
        assert!(policy.should_retry(&"anything"));
    }

    #[test]
    fn should_retry_honors_predicate() {
        let mut policy: RetryPolicy<&str> = RetryPolicy::new(Arc::new(FixedInterval::new(Duration::from_millis(10))));
        policy.retry_predicate = Some(Arc::new(|err: &&str| *err == "retryable"));
        assert!(policy.should_retry(&"retryable"));
        assert!(!policy.should_retry(&"permanent"));
    }

    #[test]
    fn next_backoff_delegates_to_interval_fn() {
        let policy: RetryPolicy<()> = RetryPolicy::new(Arc::new(FixedInterval::new(Duration::from_millis(25))));
        assert_eq!(policy.next_backoff(0), Duration::from_millis(25));
        assert_eq!(policy.next_backoff(5), Duration::from_millis(25));
    }
}
