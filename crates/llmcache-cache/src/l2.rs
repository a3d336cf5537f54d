//! L2 persistent file-backed cache: one payload file per entry plus a
//! single JSON index (§4.4, §6 persisted state layout).

use crate::config::L2Config;
use crate::error::{CacheError, Result};
use crate::events::{CacheEvent, Tier};
use llmcache_core::events::EventListeners;
use llmcache_core::Fingerprint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

#[cfg(feature = "tracing")]
use tracing::warn;

/// A persisted index row. Mirrors §3's `CacheEntry` minus `value`, which
/// lives in the sibling payload file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The original (pre-hash) key, kept only for debugging.
    pub key: String,
    /// Milliseconds since the Unix epoch; RFC-style instant at
    /// sub-second resolution without pulling in a datetime dependency.
    pub created_at: i64,
    pub expires_at: i64,
    pub accessed_at: i64,
    pub hit_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// File-per-entry persistent cache with a JSON index mapping fingerprint to
/// metadata. All index mutations and the file writes they accompany are
/// serialised under one lock; reads only hold the lock long enough to copy
/// out metadata, per §4.4's "release before I/O" rule.
pub struct FileCache {
    cache_dir: PathBuf,
    max_entries: usize,
    max_ttl: Duration,
    default_ttl: Duration,
    max_file_size: usize,
    name: String,
    index: Mutex<HashMap<Fingerprint, CacheEntry>>,
    event_listeners: EventListeners<CacheEvent>,
}

impl FileCache {
    /// Loads (or initialises) the cache directory and its index. A
    /// corrupt/missing index recovers to empty rather than failing
    /// construction; the orphaned payload files are reclaimed lazily by a
    /// future `cleanup`.
    pub async fn new(config: L2Config) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&config.cache_dir).await?;
        let index = load_index(&config.cache_dir).await;
        Ok(Self {
            cache_dir: config.cache_dir,
            max_entries: config.max_entries,
            max_ttl: config.max_ttl,
            default_ttl: config.default_ttl,
            max_file_size: config.max_file_size,
            name: config.name,
            index: Mutex::new(index),
            event_listeners: EventListeners::new(),
        })
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: llmcache_core::events::EventListener<CacheEvent> + 'static,
    {
        self.event_listeners.add(listener);
    }

    fn payload_path(&self, key: &Fingerprint) -> PathBuf {
        self.cache_dir.join(key.as_str())
    }

    fn index_path(&self) -> PathBuf {
        self.cache_dir.join("index.json")
    }

    /// Looks up `key` and, if present and unexpired, returns its value and
    /// remaining TTL. Read failures (missing/unreadable payload file) purge
    /// the index entry and degrade to a miss, never an `Err`.
    pub async fn get(&self, key: &Fingerprint) -> Option<(String, Duration)> {
        let entry = {
            let index = self.index.lock().await;
            index.get(key).cloned()
        };
        let entry = entry?;
        let now = now_ms();
        if entry.expires_at <= now {
            self.index.lock().await.remove(key);
            return None;
        }

        match tokio::fs::read_to_string(self.payload_path(key)).await {
            Ok(value) => {
                let remaining = Duration::from_millis((entry.expires_at - now).max(0) as u64);
                let mut index = self.index.lock().await;
                if let Some(stored) = index.get_mut(key) {
                    stored.accessed_at = now;
                    stored.hit_count += 1;
                }
                self.event_listeners.emit(&CacheEvent::Hit {
                    name: self.name.clone(),
                    timestamp: std::time::Instant::now(),
                    tier: Tier::L2,
                });
                Some((value, remaining))
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                warn!(cache = %self.name, key = %key, "l2 payload unreadable, purging index entry");
                self.index.lock().await.remove(key);
                None
            }
        }
    }

    /// Writes `value` under `key` with `original_key` kept for debugging.
    /// `ttl` is clamped to `[1ms, max_ttl]`. Evicts the least-recently-used
    /// entry (by `accessed_at`) when the index is at `max_entries` and
    /// `key` is new.
    pub async fn set(
        &self,
        key: Fingerprint,
        original_key: impl Into<String>,
        value: &str,
        ttl: Duration,
    ) -> Result<()> {
        if value.len() > self.max_file_size {
            return Err(CacheError::PayloadTooLarge {
                size: value.len(),
                max: self.max_file_size,
            });
        }
        let ttl = ttl.clamp(Duration::from_millis(1), self.max_ttl);

        let mut index = self.index.lock().await;
        if !index.contains_key(&key) && index.len() >= self.max_entries {
            if let Some(lru_key) = index
                .iter()
                .min_by_key(|(_, e)| e.accessed_at)
                .map(|(k, _)| k.clone())
            {
                index.remove(&lru_key);
                let _ = tokio::fs::remove_file(self.payload_path(&lru_key)).await;
                self.event_listeners.emit(&CacheEvent::Eviction {
                    name: self.name.clone(),
                    timestamp: std::time::Instant::now(),
                    tier: Tier::L2,
                });
            }
        }

        tokio::fs::write(self.payload_path(&key), value)
            .await
            .map_err(|source| CacheError::CacheWriteError { source })?;
        set_permissions(&self.payload_path(&key)).await;

        let now = now_ms();
        index.insert(
            key,
            CacheEntry {
                key: original_key.into(),
                created_at: now,
                expires_at: now + ttl.as_millis() as i64,
                accessed_at: now,
                hit_count: 0,
                tags: None,
            },
        );
        self.persist_index(&index).await
    }

    pub async fn delete(&self, key: &Fingerprint) {
        let mut index = self.index.lock().await;
        index.remove(key);
        let _ = tokio::fs::remove_file(self.payload_path(key)).await;
        let _ = self.persist_index(&index).await;
    }

    pub async fn clear(&self) -> Result<()> {
        let mut index = self.index.lock().await;
        for key in index.keys() {
            let _ = tokio::fs::remove_file(self.payload_path(key)).await;
        }
        index.clear();
        self.persist_index(&index).await
    }

    /// Removes every expired entry and persists the index once.
    pub async fn cleanup(&self) -> Result<usize> {
        let mut index = self.index.lock().await;
        let now = now_ms();
        let expired: Vec<Fingerprint> = index
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            index.remove(key);
            let _ = tokio::fs::remove_file(self.payload_path(key)).await;
        }
        if !expired.is_empty() {
            self.persist_index(&index).await?;
        }
        Ok(expired.len())
    }

    pub async fn len(&self) -> usize {
        self.index.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Spawns a background task that calls `cleanup` on `interval`. The
    /// returned handle is aborted on drop by the caller if it shouldn't
    /// outlive the cache (the cache itself is `Arc`-shared to keep it
    /// alive for the task's lifetime).
    pub fn spawn_cleanup_timer(self: std::sync::Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let _ = self.cleanup().await;
            }
        })
    }

    async fn persist_index(&self, index: &HashMap<Fingerprint, CacheEntry>) -> Result<()> {
        let serializable: HashMap<&str, &CacheEntry> =
            index.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let json = serde_json::to_string_pretty(&serializable).unwrap_or_else(|_| "{}".to_string());
        tokio::fs::write(self.index_path(), json)
            .await
            .map_err(|source| CacheError::CacheWriteError { source })?;
        set_permissions(&self.index_path()).await;
        Ok(())
    }
}

#[cfg(unix)]
async fn set_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = tokio::fs::metadata(path).await {
        let mut perms = meta.permissions();
        perms.set_mode(0o600);
        let _ = tokio::fs::set_permissions(path, perms).await;
    }
}

#[cfg(not(unix))]
async fn set_permissions(_path: &Path) {}

async fn load_index(cache_dir: &Path) -> HashMap<Fingerprint, CacheEntry> {
    let index_path = cache_dir.join("index.json");
    let Ok(contents) = tokio::fs::read_to_string(&index_path).await else {
        return HashMap::new();
    };
    let Ok(raw): std::result::Result<HashMap<String, CacheEntry>, _> = serde_json::from_str(&contents)
    else {
        return HashMap::new();
    };
    raw.into_iter()
        .filter_map(|(hash, entry)| Fingerprint::from_hash(hash).map(|fp| (fp, entry)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::L2ConfigBuilder;

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

    async fn cache(dir: &Path, max_entries: usize, max_file_size: usize) -> FileCache {
        FileCache::new(
            L2ConfigBuilder::new()
                .cache_dir(dir)
                .max_entries(max_entries)
                .max_file_size(max_file_size)
                .default_ttl(Duration::from_secs(3600))
                .max_ttl(Duration::from_secs(3600))
                .build(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), 100, 1024).await;
        let key = fp("a");
        cache.set(key.clone(), "a", "hello", Duration::from_secs(60)).await.unwrap();
        let (value, _ttl) = cache.get(&key).await.unwrap();
        assert_eq!(value, "hello");
    }

    #[tokio::test]
    async fn payload_exactly_at_max_size_succeeds_one_byte_over_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), 100, 4).await;
        let ok_key = fp("ok");
        let too_big_key = fp("big");
        assert!(cache.set(ok_key, "ok", "abcd", Duration::from_secs(60)).await.is_ok());
        let err = cache
            .set(too_big_key, "big", "abcde", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::PayloadTooLarge { size: 5, max: 4 }));
    }

    #[tokio::test]
    async fn read_of_missing_payload_file_self_heals_to_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), 100, 1024).await;
        let key = fp("vanishing");
        cache.set(key.clone(), "vanishing", "v", Duration::from_secs(60)).await.unwrap();
        tokio::fs::remove_file(cache.payload_path(&key)).await.unwrap();
        assert_eq!(cache.get(&key).await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn eviction_removes_least_recently_accessed_when_full() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), 2, 1024).await;
        let (a, b, c) = (fp("a"), fp("b"), fp("c"));
        cache.set(a.clone(), "a", "A", Duration::from_secs(60)).await.unwrap();
        cache.set(b.clone(), "b", "B", Duration::from_secs(60)).await.unwrap();
        // Touch `a` so `b` becomes the least-recently-accessed.
        cache.get(&a).await;
        cache.set(c.clone(), "c", "C", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get(&b).await, None);
        assert!(cache.get(&a).await.is_some());
        assert!(cache.get(&c).await.is_some());
    }

    #[tokio::test]
    async fn cleanup_removes_only_expired_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(
            L2ConfigBuilder::new()
                .cache_dir(dir.path())
                .max_entries(100)
                .max_file_size(1024)
                .default_ttl(Duration::from_millis(20))
                .max_ttl(Duration::from_secs(3600))
                .build(),
        )
        .await
        .unwrap();
        let short = fp("short");
        let long = fp("long");
        cache.set(short.clone(), "short", "1", Duration::from_millis(20)).await.unwrap();
        cache.set(long.clone(), "long", "2", Duration::from_secs(3600)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        let removed = cache.cleanup().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cache.get(&short).await, None);
        assert!(cache.get(&long).await.is_some());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), 100, 1024).await;
        let key = fp("k");
        cache.delete(&key).await;
        cache.delete(&key).await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn corrupt_index_recovers_to_empty_on_startup() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("index.json"), "{not valid json")
            .await
            .unwrap();
        let cache = cache(dir.path(), 100, 1024).await;
        assert_eq!(cache.len().await, 0);
    }
}
