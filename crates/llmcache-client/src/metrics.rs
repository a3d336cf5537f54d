//! Per-host metrics collected on every completed resilient-client attempt:
//! call count, failure count, and an EMA of latency (spec §4.2, α=0.1).
//! Read-mostly; [`HostMetricsRegistry::snapshot`] deep-copies so readers
//! never see another writer's in-progress update.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Smoothing factor for the per-host latency EMA (spec-mandated α=0.1).
const EMA_ALPHA: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostMetricsSnapshot {
    pub calls: u64,
    pub failures: u64,
    pub ema_latency: Duration,
}

impl HostMetricsSnapshot {
    pub fn failure_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.failures as f64 / self.calls as f64
        }
    }
}

#[derive(Default)]
struct HostMetrics {
    calls: u64,
    failures: u64,
    ema_latency_secs: f64,
}

impl HostMetrics {
    fn record(&mut self, success: bool, latency: Duration) {
        self.calls += 1;
        if !success {
            self.failures += 1;
        }
        let sample = latency.as_secs_f64();
        self.ema_latency_secs = if self.calls == 1 {
            sample
        } else {
            EMA_ALPHA * sample + (1.0 - EMA_ALPHA) * self.ema_latency_secs
        };
    }

    fn snapshot(&self) -> HostMetricsSnapshot {
        HostMetricsSnapshot {
            calls: self.calls,
            failures: self.failures,
            ema_latency: Duration::from_secs_f64(self.ema_latency_secs.max(0.0)),
        }
    }
}

/// A registry of [`HostMetrics`] keyed by backend/host id, one entry per
/// distinct `backend_id()` the client has ever called.
#[derive(Default)]
pub struct HostMetricsRegistry {
    hosts: RwLock<HashMap<String, HostMetrics>>,
}

impl HostMetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed attempt against `host`. Held under an
    /// exclusive lock for the duration of the update only.
    pub fn record(&self, host: &str, success: bool, latency: Duration) {
        let mut hosts = self.hosts.write().expect("host metrics lock poisoned");
        hosts.entry(host.to_string()).or_default().record(success, latency);

        #[cfg(feature = "metrics")]
        {
            let outcome = if success { "success" } else { "failure" };
            metrics::counter!("llmcache_client_calls_total", "host" => host.to_string(), "outcome" => outcome)
                .increment(1);
            metrics::histogram!("llmcache_client_latency_seconds", "host" => host.to_string())
                .record(latency.as_secs_f64());
        }
    }

    /// A deep-copied snapshot for `host`, or the zero value if it has never
    /// been recorded against.
    pub fn snapshot(&self, host: &str) -> HostMetricsSnapshot {
        let hosts = self.hosts.read().expect("host metrics lock poisoned");
        hosts.get(host).map(HostMetrics::snapshot).unwrap_or_default()
    }

    /// Snapshots of every host this registry has ever recorded against.
    pub fn snapshot_all(&self) -> HashMap<String, HostMetricsSnapshot> {
        let hosts = self.hosts.read().expect("host metrics lock poisoned");
        hosts.iter().map(|(k, v)| (k.clone(), v.snapshot())).collect()
    }
}
