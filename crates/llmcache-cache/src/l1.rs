//! L1 in-process LRU cache, keyed by request [`Fingerprint`] (§4.3).

use crate::events::{CacheEvent, Tier};
use llmcache_core::events::EventListeners;
use llmcache_core::Fingerprint;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// An L1 entry: the same fields as [`crate::l2::CacheEntry`] minus `tags`.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    pub value: String,
    pub created_at: Instant,
    pub expires_at: Instant,
    pub accessed_at: Instant,
    pub hit_count: u64,
}

impl MemoryEntry {
    fn new(value: String, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl,
            accessed_at: now,
            hit_count: 0,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Bounded LRU keyed by fingerprint. `get` touches recency order and
/// per-entry stats; all mutating operations (including reads that touch
/// recency) take the exclusive lock.
pub struct MemoryCache {
    inner: Mutex<LruCache<Fingerprint, MemoryEntry>>,
    default_ttl: Duration,
    enabled: bool,
    name: String,
    event_listeners: EventListeners<CacheEvent>,
}

impl MemoryCache {
    pub fn new(config: crate::config::L1Config) -> Self {
        let capacity = NonZeroUsize::new(config.capacity.max(1)).expect("capacity.max(1) is never 0");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            default_ttl: config.default_ttl,
            enabled: config.capacity > 0,
            name: config.name,
            event_listeners: EventListeners::new(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: llmcache_core::events::EventListener<CacheEvent> + 'static,
    {
        self.event_listeners.add(listener);
    }

    /// The TTL a per-entry `ttl` is clamped to when admitted into L1.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// On hit, moves the entry to front and bumps `accessed_at`/`hit_count`.
    /// An expired entry is purged and treated as a miss.
    pub fn get(&self, key: &Fingerprint) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let mut inner = self.inner.lock().expect("l1 mutex poisoned");
        match inner.get_mut(key) {
            Some(entry) if entry.is_expired() => {
                inner.pop(key);
                None
            }
            Some(entry) => {
                entry.accessed_at = Instant::now();
                entry.hit_count += 1;
                let value = entry.value.clone();
                self.event_listeners.emit(&CacheEvent::Hit {
                    name: self.name.clone(),
                    timestamp: Instant::now(),
                    tier: Tier::L1,
                });
                Some(value)
            }
            None => None,
        }
    }

    /// Inserts or updates `key`, clamping `ttl` to `default_ttl`. Evicts the
    /// least-recently-used entry if the cache is at capacity and `key` is
    /// new.
    pub fn set(&self, key: Fingerprint, value: String, ttl: Duration) {
        if !self.enabled {
            return;
        }
        let ttl = ttl.min(self.default_ttl);
        let mut inner = self.inner.lock().expect("l1 mutex poisoned");
        let was_present = inner.contains(&key);
        let evicted = inner.push(key, MemoryEntry::new(value, ttl));
        if !was_present {
            if let Some((_, _)) = evicted {
                self.event_listeners.emit(&CacheEvent::Eviction {
                    name: self.name.clone(),
                    timestamp: Instant::now(),
                    tier: Tier::L1,
                });
            }
        }
    }

    pub fn delete(&self, key: &Fingerprint) {
        let mut inner = self.inner.lock().expect("l1 mutex poisoned");
        inner.pop(key);
    }

    /// Sweeps every entry and removes those that have expired. O(n).
    pub fn cleanup(&self) -> usize {
        let mut inner = self.inner.lock().expect("l1 mutex poisoned");
        let expired: Vec<Fingerprint> = inner
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            inner.pop(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("l1 mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().expect("l1 mutex poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::L1ConfigBuilder;

    fn fp(tag: &str) -> Fingerprint {
        Fingerprint::of(&llmcache_core::FingerprintKey {
            backend_id: "b".into(),
            model_id: "m".into(),
            captured_context: tag.into(),
            language: "en".into(),
            request_kind: "suggestion".into(),
            prompt: None,
        })
        .unwrap()
    }

    #[test]
    fn lru_eviction_order_matches_scenario_1() {
        let cache = MemoryCache::new(L1ConfigBuilder::new().capacity(3).default_ttl(Duration::from_secs(60)).build());
        let (a, b, c, d) = (fp("a"), fp("b"), fp("c"), fp("d"));
        cache.set(a.clone(), "A".into(), Duration::from_secs(60));
        cache.set(b.clone(), "B".into(), Duration::from_secs(60));
        cache.set(c.clone(), "C".into(), Duration::from_secs(60));
        assert_eq!(cache.get(&a), Some("A".into()));
        cache.set(d.clone(), "D".into(), Duration::from_secs(60));

        assert_eq!(cache.get(&b), None);
        assert_eq!(cache.get(&a), Some("A".into()));
        assert_eq!(cache.get(&c), Some("C".into()));
        assert_eq!(cache.get(&d), Some("D".into()));
    }

    #[test]
    fn capacity_zero_disables_l1() {
        let cache = MemoryCache::new(L1ConfigBuilder::new().capacity(0).build());
        let key = fp("x");
        cache.set(key.clone(), "V".into(), Duration::from_secs(60));
        assert_eq!(cache.get(&key), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn ttl_clamped_to_default_and_expiry_purges() {
        let cache = MemoryCache::new(L1ConfigBuilder::new().capacity(10).default_ttl(Duration::from_millis(20)).build());
        let key = fp("short");
        cache.set(key.clone(), "V".into(), Duration::from_secs(3600));
        assert_eq!(cache.get(&key), Some("V".into()));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn cleanup_sweeps_only_expired_entries() {
        let cache = MemoryCache::new(L1ConfigBuilder::new().capacity(10).default_ttl(Duration::from_secs(60)).build());
        let short = fp("short");
        let long = fp("long");
        cache.set(short.clone(), "1".into(), Duration::from_millis(20));
        cache.set(long.clone(), "2".into(), Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(40));
        let removed = cache.cleanup();
        assert_eq!(removed, 1);
        assert_eq!(cache.get(&short), None);
        assert_eq!(cache.get(&long), Some("2".into()));
    }

    #[test]
    fn delete_is_a_noop_on_missing_key() {
        let cache = MemoryCache::new(L1ConfigBuilder::new().capacity(10).build());
        let key = fp("missing");
        cache.delete(&key);
        cache.delete(&key);
    }

    #[test]
    fn set_same_key_twice_does_not_grow_size() {
        let cache = MemoryCache::new(L1ConfigBuilder::new().capacity(10).build());
        let key = fp("k");
        cache.set(key.clone(), "1".into(), Duration::from_secs(60));
        cache.set(key.clone(), "2".into(), Duration::from_secs(60));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key), Some("2".into()));
    }
}
