//! Events emitted by the L1/L2/layered cache tiers.

use llmcache_core::events::ResilienceEvent;
use std::time::Instant;

/// Which tier an event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    L1,
    L2,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Tier::L1 => "l1",
            Tier::L2 => "l2",
        })
    }
}

/// Events emitted by [`crate::MemoryCache`], [`crate::FileCache`] and
/// [`crate::LayeredCache`].
#[derive(Debug, Clone)]
pub enum CacheEvent {
    Hit {
        name: String,
        timestamp: Instant,
        tier: Tier,
    },
    Miss {
        name: String,
        timestamp: Instant,
    },
    Eviction {
        name: String,
        timestamp: Instant,
        tier: Tier,
    },
    /// An L2 hit was copied up into L1 (§4.5).
    Promotion {
        name: String,
        timestamp: Instant,
    },
    WriteError {
        name: String,
        timestamp: Instant,
        message: String,
    },
}

impl ResilienceEvent for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "hit",
            CacheEvent::Miss { .. } => "miss",
            CacheEvent::Eviction { .. } => "eviction",
            CacheEvent::Promotion { .. } => "promotion",
            CacheEvent::WriteError { .. } => "write_error",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { timestamp, .. }
            | CacheEvent::Miss { timestamp, .. }
            | CacheEvent::Eviction { timestamp, .. }
            | CacheEvent::Promotion { timestamp, .. }
            | CacheEvent::WriteError { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            CacheEvent::Hit { name, .. }
            | CacheEvent::Miss { name, .. }
            | CacheEvent::Eviction { name, .. }
            | CacheEvent::Promotion { name, .. }
            | CacheEvent::WriteError { name, .. } => name,
        }
    }
}
