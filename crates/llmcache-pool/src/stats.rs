//! Counters tracked by a worker pool: completed/failed totals and an EMA of
//! execution time, serialised under a single lock per the shared-resource
//! policy used across this workspace (exclusive lock for writes, snapshot
//! deep-copies for reads).

use std::sync::Mutex;
use std::time::Duration;

/// Smoothing factor for the exponential moving average of task duration.
const EMA_ALPHA: f64 = 0.2;

#[derive(Debug, Clone, Copy, Default)]
pub struct PoolStatsSnapshot {
    pub completed: u64,
    pub failed: u64,
    pub average_time: Duration,
}

#[derive(Default)]
struct Inner {
    completed: u64,
    failed: u64,
    average_time_secs: f64,
}

/// Thread-safe counters for a worker pool. Enabled or disabled wholesale via
/// the pool's `enable_stats` construction parameter.
pub struct PoolStats {
    enabled: bool,
    inner: Mutex<Inner>,
}

impl PoolStats {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn record(&self, outcome: Result<(), ()>, duration: Duration) {
        if !self.enabled {
            return;
        }
        let mut inner = self.inner.lock().expect("pool stats lock poisoned");
        match outcome {
            Ok(()) => inner.completed += 1,
            Err(()) => inner.failed += 1,
        }
        let sample = duration.as_secs_f64();
        inner.average_time_secs = if inner.completed + inner.failed == 1 {
            sample
        } else {
            EMA_ALPHA * sample + (1.0 - EMA_ALPHA) * inner.average_time_secs
        };
    }

    pub fn snapshot(&self) -> PoolStatsSnapshot {
        let inner = self.inner.lock().expect("pool stats lock poisoned");
        PoolStatsSnapshot {
            completed: inner.completed,
            failed: inner.failed,
            average_time: Duration::from_secs_f64(inner.average_time_secs.max(0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_stats_stay_at_zero() {
        let stats = PoolStats::new(false);
        stats.record(Ok(()), Duration::from_millis(10));
        let snap = stats.snapshot();
        assert_eq!(snap.completed, 0);
    }

    #[test]
    fn first_sample_sets_average_directly() {
        let stats = PoolStats::new(true);
        stats.record(Ok(()), Duration::from_millis(100));
        let snap = stats.snapshot();
        assert_eq!(snap.completed, 1);
        assert_eq!(snap.average_time, Duration::from_millis(100));
    }

    #[test]
    fn failed_and_completed_are_tracked_independently() {
        let stats = PoolStats::new(true);
        stats.record(Ok(()), Duration::from_millis(10));
        stats.record(Err(()), Duration::from_millis(10));
        stats.record(Ok(()), Duration::from_millis(10));
        let snap = stats.snapshot();
        assert_eq!(snap.completed, 2);
        assert_eq!(snap.failed, 1);
    }
}
