//! Events emitted by the resource governor.

use crate::governor::ResourceKind;
use llmcache_core::events::ResilienceEvent;
use std::time::{Duration, Instant};

/// Events emitted while quotas are acquired, released or monitored.
#[derive(Debug, Clone)]
pub enum GovernorEvent {
    /// An `acquire` call was denied because it would exceed the limit.
    AcquireDenied {
        name: String,
        timestamp: Instant,
        kind: ResourceKind,
        current: u64,
        requested: u64,
        limit: u64,
    },
    /// The background monitor observed utilisation above the configured
    /// warning threshold.
    UtilisationWarning {
        name: String,
        timestamp: Instant,
        kind: ResourceKind,
        utilisation: f64,
        threshold: f64,
    },
    /// A [`crate::pool::ResourcePool`] borrow waited at least this long
    /// before a resource became available.
    PoolWaited {
        name: String,
        timestamp: Instant,
        pool: String,
        wait: Duration,
    },
}

impl ResilienceEvent for GovernorEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GovernorEvent::AcquireDenied { .. } => "acquire_denied",
            GovernorEvent::UtilisationWarning { .. } => "utilisation_warning",
            GovernorEvent::PoolWaited { .. } => "pool_waited",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            GovernorEvent::AcquireDenied { timestamp, .. } => *timestamp,
            GovernorEvent::UtilisationWarning { timestamp, .. } => *timestamp,
            GovernorEvent::PoolWaited { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            GovernorEvent::AcquireDenied { name, .. } => name,
            GovernorEvent::UtilisationWarning { name, .. } => name,
            GovernorEvent::PoolWaited { name, .. } => name,
        }
    }
}
