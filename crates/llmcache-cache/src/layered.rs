//! The layered cache: L1 over L2, with promotion and write-through (§4.5).

use crate::config::LayeredCacheConfig;
use crate::error::Result;
use crate::events::CacheEvent;
use crate::l1::MemoryCache;
use crate::l2::FileCache;
use crate::stats::{CacheStats, CacheStatsSnapshot};
use llmcache_core::events::EventListeners;
use llmcache_core::Fingerprint;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Composes [`MemoryCache`] (L1, primary lookup) over an optional
/// [`FileCache`] (L2, persistent). `l2` is `None` when `L2Config::enabled`
/// is false, in which case this degrades to an L1-only cache.
pub struct LayeredCache {
    l1: MemoryCache,
    l2: Option<Arc<FileCache>>,
    write_through: bool,
    name: String,
    stats: CacheStats,
    event_listeners: EventListeners<CacheEvent>,
}

impl LayeredCache {
    pub fn new(l1: MemoryCache, l2: Option<Arc<FileCache>>, config: LayeredCacheConfig) -> Self {
        Self {
            l1,
            l2,
            write_through: config.write_through,
            name: config.name,
            stats: CacheStats::new(),
            event_listeners: EventListeners::new(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: llmcache_core::events::EventListener<CacheEvent> + 'static,
    {
        self.event_listeners.add(listener);
    }

    /// L1 hit returns directly. An L2 hit is promoted into L1 (clamped to
    /// `min(l2_remaining_ttl, l1_default_ttl)`) before returning. Otherwise
    /// a miss.
    pub async fn get(&self, key: &Fingerprint) -> Option<String> {
        if let Some(value) = self.l1.get(key) {
            self.stats.record_l1_hit();
            return Some(value);
        }

        if let Some(l2) = &self.l2 {
            if let Some((value, remaining_ttl)) = l2.get(key).await {
                self.stats.record_l2_hit();
                self.stats.record_promotion();
                let promote_ttl = remaining_ttl.min(self.l1.default_ttl());
                self.l1.set(key.clone(), value.clone(), promote_ttl);
                self.event_listeners.emit(&CacheEvent::Promotion {
                    name: self.name.clone(),
                    timestamp: Instant::now(),
                });
                return Some(value);
            }
        }

        self.stats.record_miss();
        self.event_listeners.emit(&CacheEvent::Miss {
            name: self.name.clone(),
            timestamp: Instant::now(),
        });
        None
    }

    /// Always writes L1 (ttl clamped to `l1_default_ttl`). Also writes L2,
    /// with the full `ttl`, when `write_through` is enabled and L2 is
    /// present.
    pub async fn set(
        &self,
        key: Fingerprint,
        original_key: impl Into<String>,
        value: String,
        ttl: Duration,
    ) -> Result<()> {
        self.l1.set(key.clone(), value.clone(), ttl);
        if self.write_through {
            if let Some(l2) = &self.l2 {
                l2.set(key, original_key, &value, ttl).await?;
            }
        }
        Ok(())
    }

    pub async fn delete(&self, key: &Fingerprint) {
        self.l1.delete(key);
        if let Some(l2) = &self.l2 {
            l2.delete(key).await;
        }
    }

    /// Drops every entry from both tiers.
    pub async fn clear(&self) -> Result<()> {
        self.l1.clear();
        if let Some(l2) = &self.l2 {
            l2.clear().await?;
        }
        Ok(())
    }

    /// Fetches each of `keys` from L2 and inserts it into L1, skipping keys
    /// L2 doesn't have.
    pub async fn warm_up(&self, keys: &[Fingerprint]) {
        let Some(l2) = &self.l2 else { return };
        for key in keys {
            if let Some((value, remaining_ttl)) = l2.get(key).await {
                let ttl = remaining_ttl.min(self.l1.default_ttl());
                self.l1.set(key.clone(), value, ttl);
            }
        }
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn l2(&self) -> Option<&Arc<FileCache>> {
        self.l2.as_ref()
    }
}
