//! Atomic quota tracking for memory, task and file-handle budgets.

use crate::config::GovernorConfig;
use crate::error::GovernorError;
use crate::events::GovernorEvent;
use llmcache_core::events::EventListeners;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::gauge;

#[cfg(feature = "tracing")]
use tracing::warn;

/// The three quotas the governor tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Memory,
    Tasks,
    Handles,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Memory => "memory",
            ResourceKind::Tasks => "tasks",
            ResourceKind::Handles => "handles",
        };
        f.write_str(s)
    }
}

/// A single atomic counter bounded by a hard limit fixed at construction.
struct Counter {
    current: AtomicU64,
    limit: u64,
}

impl Counter {
    fn new(limit: u64) -> Self {
        Self {
            current: AtomicU64::new(0),
            limit,
        }
    }

    /// Atomically checks `current + amount <= limit` and increments on
    /// success. Never blocks.
    fn acquire(&self, amount: u64) -> Result<(), (u64, u64)> {
        let mut current = self.current.load(Ordering::Acquire);
        loop {
            let next = current + amount;
            if next > self.limit {
                return Err((current, self.limit));
            }
            match self.current.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(observed) => current = observed,
            }
        }
    }

    /// Decrements, clamping at zero so an over-release (a programmer error)
    /// cannot underflow the counter.
    fn release(&self, amount: u64) {
        let mut current = self.current.load(Ordering::Acquire);
        loop {
            let next = current.saturating_sub(amount);
            match self.current.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    fn utilisation(&self) -> f64 {
        if self.limit == 0 {
            0.0
        } else {
            self.current() as f64 / self.limit as f64
        }
    }
}

/// Tracks process-wide memory/task/handle quotas via lock-free atomics.
///
/// `acquire`/`release` never block; callers that need at-capacity waiting
/// should use [`crate::pool::ResourcePool`] instead.
pub struct Governor {
    memory: Counter,
    tasks: Counter,
    handles: Counter,
    pub(crate) config: Arc<GovernorConfig>,
    pub(crate) event_listeners: EventListeners<GovernorEvent>,
}

impl Governor {
    pub fn new(config: GovernorConfig) -> Self {
        let memory = Counter::new(config.memory_limit_bytes);
        let tasks = Counter::new(config.task_limit);
        let handles = Counter::new(config.handle_limit);
        Self {
            memory,
            tasks,
            handles,
            config: Arc::new(config),
            event_listeners: EventListeners::new(),
        }
    }

    pub fn with_config(config: GovernorConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    fn counter(&self, kind: ResourceKind) -> &Counter {
        match kind {
            ResourceKind::Memory => &self.memory,
            ResourceKind::Tasks => &self.tasks,
            ResourceKind::Handles => &self.handles,
        }
    }

    /// Atomically checks `current + amount <= limit` and increments on
    /// success. Does not block; callers decide how to react to
    /// [`GovernorError::OverLimit`].
    pub fn acquire(&self, kind: ResourceKind, amount: u64) -> Result<(), GovernorError> {
        match self.counter(kind).acquire(amount) {
            Ok(()) => Ok(()),
            Err((current, limit)) => {
                let event = GovernorEvent::AcquireDenied {
                    name: self.config.name.clone(),
                    timestamp: Instant::now(),
                    kind,
                    current,
                    requested: amount,
                    limit,
                };
                self.event_listeners.emit(&event);

                #[cfg(feature = "tracing")]
                warn!(governor = %self.config.name, %kind, current, requested = amount, limit, "resource acquire denied");

                Err(GovernorError::OverLimit {
                    kind,
                    current,
                    requested: amount,
                    limit,
                })
            }
        }
    }

    /// Atomically decrements. Releasing more than was acquired is a
    /// programmer error; the counter clamps at zero rather than underflowing.
    pub fn release(&self, kind: ResourceKind, amount: u64) {
        self.counter(kind).release(amount);

        #[cfg(feature = "metrics")]
        gauge!("governor_resource_current", "governor" => self.config.name.clone(), "kind" => kind.to_string())
            .set(self.counter(kind).current() as f64);
    }

    pub fn current(&self, kind: ResourceKind) -> u64 {
        self.counter(kind).current()
    }

    pub fn limit(&self, kind: ResourceKind) -> u64 {
        self.counter(kind).limit
    }

    pub fn utilisation(&self, kind: ResourceKind) -> f64 {
        self.counter(kind).utilisation()
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: llmcache_core::events::EventListener<GovernorEvent> + 'static,
    {
        self.event_listeners.add(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn governor(limit: u64) -> Governor {
        Governor::new(GovernorConfig::builder().task_limit(limit).build())
    }

    #[test]
    fn acquire_at_exactly_limit_succeeds() {
        let g = governor(10);
        assert!(g.acquire(ResourceKind::Tasks, 10).is_ok());
        assert!(g.acquire(ResourceKind::Tasks, 1).is_err());
    }

    #[test]
    fn release_restores_quota() {
        let g = governor(10);
        g.acquire(ResourceKind::Tasks, 10).unwrap();
        g.release(ResourceKind::Tasks, 10);
        assert_eq!(g.current(ResourceKind::Tasks), 0);
        assert!(g.acquire(ResourceKind::Tasks, 10).is_ok());
    }

    #[test]
    fn over_release_clamps_at_zero() {
        let g = governor(10);
        g.acquire(ResourceKind::Tasks, 3).unwrap();
        g.release(ResourceKind::Tasks, 100);
        assert_eq!(g.current(ResourceKind::Tasks), 0);
    }

    #[test]
    fn acquire_release_roundtrip_returns_to_start() {
        let g = governor(100);
        for amount in [5, 10, 20] {
            g.acquire(ResourceKind::Memory, amount).unwrap();
            g.release(ResourceKind::Memory, amount);
        }
        assert_eq!(g.current(ResourceKind::Memory), 0);
    }

    #[test]
    fn over_limit_does_not_increment_counter() {
        let g = governor(5);
        g.acquire(ResourceKind::Handles, 5).unwrap();
        let err = g.acquire(ResourceKind::Handles, 1).unwrap_err();
        assert!(matches!(err, GovernorError::OverLimit { .. }));
        assert_eq!(g.current(ResourceKind::Handles), 5);
    }

    #[test]
    fn independent_quotas_do_not_interfere() {
        let g = governor(10);
        g.acquire(ResourceKind::Memory, 10).unwrap();
        assert!(g.acquire(ResourceKind::Tasks, 10).is_ok());
    }
}
