//! Events emitted by the similarity sidecar and semantic index.

use llmcache_core::events::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum SimilarityEvent {
    /// A query matched an existing entry above the configured threshold.
    ApproximateHit {
        name: String,
        timestamp: Instant,
        score: f64,
    },
    /// A query produced no entry meeting the threshold.
    ApproximateMiss { name: String, timestamp: Instant },
    /// The ring buffer was at capacity and dropped its oldest entry.
    Overflow { name: String, timestamp: Instant },
}

impl ResilienceEvent for SimilarityEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SimilarityEvent::ApproximateHit { .. } => "approximate_hit",
            SimilarityEvent::ApproximateMiss { .. } => "approximate_miss",
            SimilarityEvent::Overflow { .. } => "overflow",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            SimilarityEvent::ApproximateHit { timestamp, .. }
            | SimilarityEvent::ApproximateMiss { timestamp, .. }
            | SimilarityEvent::Overflow { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            SimilarityEvent::ApproximateHit { name, .. }
            | SimilarityEvent::ApproximateMiss { name, .. }
            | SimilarityEvent::Overflow { name, .. } => name,
        }
    }
}
