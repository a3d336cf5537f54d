//! Atomic cache counters (§3 `CacheStats`): monotonic except on explicit reset.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters for a [`crate::LayeredCache`].
#[derive(Debug, Default)]
pub struct CacheStats {
    l1_hits: AtomicU64,
    l2_hits: AtomicU64,
    misses: AtomicU64,
    promotions: AtomicU64,
    evictions: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`] plus a derived hit rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStatsSnapshot {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub misses: u64,
    pub promotions: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_l1_hit(&self) {
        self.l1_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_l2_hit(&self) {
        self.l2_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let l1_hits = self.l1_hits.load(Ordering::Relaxed);
        let l2_hits = self.l2_hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = l1_hits + l2_hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            (l1_hits + l2_hits) as f64 / total as f64
        };
        CacheStatsSnapshot {
            l1_hits,
            l2_hits,
            misses,
            promotions: self.promotions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate,
        }
    }

    /// Resets every counter to zero. The only sanctioned way counters move
    /// backwards (§3).
    pub fn reset(&self) {
        self.l1_hits.store(0, Ordering::Relaxed);
        self.l2_hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.promotions.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_is_zero_with_no_activity() {
        let stats = CacheStats::new();
        assert_eq!(stats.snapshot().hit_rate, 0.0);
    }

    #[test]
    fn hit_rate_reflects_hits_over_total() {
        let stats = CacheStats::new();
        stats.record_l1_hit();
        stats.record_l2_hit();
        stats.record_miss();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hit_rate, 2.0 / 3.0);
    }

    #[test]
    fn reset_zeroes_every_counter() {
        let stats = CacheStats::new();
        stats.record_l1_hit();
        stats.record_promotion();
        stats.reset();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.l1_hits, 0);
        assert_eq!(snapshot.promotions, 0);
    }
}
