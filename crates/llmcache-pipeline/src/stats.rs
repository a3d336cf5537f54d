//! Per-stage and per-pipeline counters (§4.9): processed/error totals plus
//! an EMA of latency, with running min/max for the per-stage figures.
//! Writes are serialised under a single lock; reads deep-copy a snapshot.

use std::sync::Mutex;
use std::time::Duration;

const EMA_ALPHA: f64 = 0.2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageStatsSnapshot {
    pub processed: u64,
    pub errors: u64,
    pub avg: Duration,
    pub min: Duration,
    pub max: Duration,
}

#[derive(Default)]
struct StageInner {
    processed: u64,
    errors: u64,
    avg_secs: f64,
    min_secs: f64,
    max_secs: f64,
}

/// Counters for a single pipeline stage.
pub struct StageStats {
    inner: Mutex<StageInner>,
}

impl StageStats {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StageInner::default()),
        }
    }

    pub fn record(&self, outcome: Result<(), ()>, duration: Duration) {
        let mut inner = self.inner.lock().expect("stage stats lock poisoned");
        match outcome {
            Ok(()) => inner.processed += 1,
            Err(()) => inner.errors += 1,
        }
        let sample = duration.as_secs_f64();
        let total = inner.processed + inner.errors;
        inner.avg_secs = if total == 1 {
            sample
        } else {
            EMA_ALPHA * sample + (1.0 - EMA_ALPHA) * inner.avg_secs
        };
        inner.min_secs = if total == 1 { sample } else { inner.min_secs.min(sample) };
        inner.max_secs = inner.max_secs.max(sample);
    }

    pub fn snapshot(&self) -> StageStatsSnapshot {
        let inner = self.inner.lock().expect("stage stats lock poisoned");
        StageStatsSnapshot {
            processed: inner.processed,
            errors: inner.errors,
            avg: Duration::from_secs_f64(inner.avg_secs.max(0.0)),
            min: Duration::from_secs_f64(inner.min_secs.max(0.0)),
            max: Duration::from_secs_f64(inner.max_secs.max(0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineStatsSnapshot {
    pub total: u64,
    pub errors: u64,
    pub avg_latency: Duration,
}

#[derive(Default)]
struct PipelineInner {
    total: u64,
    errors: u64,
    avg_latency_secs: f64,
}

/// Whole-pipeline counters, recorded once per [`crate::Pipeline::process`] call.
pub struct PipelineStats {
    inner: Mutex<PipelineInner>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(PipelineInner::default()),
        }
    }

    pub fn record(&self, outcome: Result<(), ()>, latency: Duration) {
        let mut inner = self.inner.lock().expect("pipeline stats lock poisoned");
        inner.total += 1;
        if outcome.is_err() {
            inner.errors += 1;
        }
        let sample = latency.as_secs_f64();
        inner.avg_latency_secs = if inner.total == 1 {
            sample
        } else {
            EMA_ALPHA * sample + (1.0 - EMA_ALPHA) * inner.avg_latency_secs
        };
    }

    pub fn snapshot(&self) -> PipelineStatsSnapshot {
        let inner = self.inner.lock().expect("pipeline stats lock poisoned");
        PipelineStatsSnapshot {
            total: inner.total,
            errors: inner.errors,
            avg_latency: Duration::from_secs_f64(inner.avg_latency_secs.max(0.0)),
        }
    }
}
