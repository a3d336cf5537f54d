use rand::Rng;
use std::time::Duration;

/// Computes the delay to wait before a retry attempt.
///
/// `attempt` is 0-indexed: the delay returned for `attempt == 0` is the wait
/// before the *first* retry (i.e. after the initial call has already failed once).
pub trait IntervalFunction: Send + Sync {
    fn next_interval(&self, attempt: usize) -> Duration;
}

/// A constant backoff interval.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl IntervalFunction for FixedInterval {
    fn next_interval(&self, _attempt: usize) -> Duration {
        self.interval
    }
}

/// Exponential backoff: `initial_interval * multiplier^attempt`, capped at `max_interval`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    initial_interval: Duration,
    multiplier: f64,
    max_interval: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial_interval: Duration) -> Self {
        Self {
            initial_interval,
            multiplier: 2.0,
            max_interval: Duration::from_secs(60),
        }
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = max_interval;
        self
    }
}

impl IntervalFunction for ExponentialBackoff {
    fn next_interval(&self, attempt: usize) -> Duration {
        let factor = self.multiplier.powi(attempt as i32);
        let millis = self.initial_interval.as_secs_f64() * factor * 1000.0;
        let capped = millis.min(self.max_interval.as_millis() as f64);
        Duration::from_millis(capped.max(0.0) as u64)
    }
}

/// Exponential backoff with full jitter: the base exponential delay is randomized
/// within `±jitter_fraction` of its value, to avoid synchronized retry storms.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialRandomBackoff {
    base: ExponentialBackoff,
    jitter_fraction: f64,
}

impl ExponentialRandomBackoff {
    pub fn new(initial_interval: Duration) -> Self {
        Self {
            base: ExponentialBackoff::new(initial_interval),
            jitter_fraction: 0.25,
        }
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.base = self.base.multiplier(multiplier);
        self
    }

    pub fn max_interval(mut self, max_interval: Duration) -> Self {
        self.base = self.base.max_interval(max_interval);
        self
    }

    pub fn jitter_fraction(mut self, jitter_fraction: f64) -> Self {
        self.jitter_fraction = jitter_fraction.clamp(0.0, 1.0);
        self
    }
}

impl IntervalFunction for ExponentialRandomBackoff {
    fn next_interval(&self, attempt: usize) -> Duration {
        let base = self.base.next_interval(attempt);
        let base_millis = base.as_millis() as f64;
        let spread = base_millis * self.jitter_fraction;
        let jitter = rand::rng().random_range(-spread..=spread);
        let millis = (base_millis + jitter).max(0.0);
        Duration::from_millis(millis as u64)
    }
}

/// A custom backoff function supplied as a closure.
pub struct FnInterval<F>(F)
where
    F: Fn(usize) -> Duration + Send + Sync;

impl<F> FnInterval<F>
where
    F: Fn(usize) -> Duration + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> IntervalFunction for FnInterval<F>
where
    F: Fn(usize) -> Duration + Send + Sync,
{
    fn next_interval(&self, attempt: usize) -> Duration {
        (self.0)(attempt)
    }
}
