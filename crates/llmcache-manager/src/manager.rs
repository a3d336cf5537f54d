//! The request cache manager facade (§4.7).

use crate::config::ManagerConfig;
use crate::error::Result;
use crate::kind::RequestKind;
use crate::templates::TemplateCache;
use llmcache_cache::LayeredCache;
use llmcache_core::Fingerprint;
use llmcache_similarity::{KeyFields, SimilaritySidecar};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// What [`CacheManager::invalidate`] should clear.
#[derive(Debug, Clone)]
pub enum InvalidateTarget {
    All,
    Kind(RequestKind),
}

/// Unifies the layered cache, the similarity sidecar, and the compiled
/// template cache behind one facade. Request handlers go through this
/// rather than touching the tiers or the sidecar directly.
pub struct CacheManager {
    layered: Arc<LayeredCache>,
    sidecar: Arc<SimilaritySidecar>,
    templates: TemplateCache,
    config: ManagerConfig,
    kind_index: Mutex<HashMap<RequestKind, HashSet<Fingerprint>>>,
}

impl CacheManager {
    pub fn new(layered: Arc<LayeredCache>, sidecar: Arc<SimilaritySidecar>, config: ManagerConfig) -> Self {
        let templates = TemplateCache::new(config.template_cache_capacity);
        Self {
            layered,
            sidecar,
            templates,
            config,
            kind_index: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up `fingerprint` in the layered cache; on a miss, falls back to
    /// the similarity sidecar keyed on `query_fields`. A similarity hit is
    /// promoted into the layered cache under `fingerprint` before returning,
    /// so the next exact-match lookup is a direct hit.
    pub async fn get(&self, kind: RequestKind, fingerprint: &Fingerprint, query_fields: &KeyFields) -> Result<Option<String>> {
        if let Some(value) = self.layered.get(fingerprint).await {
            return Ok(Some(value));
        }

        if let Some(value) = self.sidecar.get_similar(query_fields) {
            let ttl = self.config.ttl_by_kind.get(kind);
            self.layered
                .set(fingerprint.clone(), query_fields.command.clone(), value.clone(), ttl)
                .await?;
            self.track(kind, fingerprint.clone());
            return Ok(Some(value));
        }

        Ok(None)
    }

    /// Writes `payload` to the layered cache under `fingerprint`'s hash and
    /// to the similarity sidecar under `key_fields`'s structured key. The
    /// TTL is selected from `kind`.
    pub async fn set(
        &self,
        kind: RequestKind,
        fingerprint: Fingerprint,
        key_fields: KeyFields,
        payload: String,
    ) -> Result<()> {
        let ttl = self.config.ttl_by_kind.get(kind);
        self.layered
            .set(fingerprint.clone(), key_fields.command.clone(), payload.clone(), ttl)
            .await?;
        self.sidecar.add(fingerprint.clone(), key_fields, payload);
        self.track(kind, fingerprint);
        Ok(())
    }

    /// Clears the targeted subset: either every entry, or only those
    /// written under a given [`RequestKind`].
    pub async fn invalidate(&self, target: InvalidateTarget) -> Result<()> {
        match target {
            InvalidateTarget::All => {
                self.layered.clear().await?;
                self.sidecar.clear();
                self.kind_index.lock().unwrap().clear();
            }
            InvalidateTarget::Kind(kind) => {
                let fingerprints = self.kind_index.lock().unwrap().remove(&kind).unwrap_or_default();
                for fingerprint in fingerprints {
                    self.layered.delete(&fingerprint).await;
                }
                self.sidecar.remove_by_kind(kind.as_str());
            }
        }
        Ok(())
    }

    pub fn templates(&self) -> &TemplateCache {
        &self.templates
    }

    fn track(&self, kind: RequestKind, fingerprint: Fingerprint) {
        self.kind_index.lock().unwrap().entry(kind).or_default().insert(fingerprint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManagerConfigBuilder;
    use llmcache_cache::{FileCache, L1ConfigBuilder, L2ConfigBuilder, LayeredCacheConfigBuilder, MemoryCache};
    use llmcache_core::FingerprintKey;
    use llmcache_similarity::SimilarityConfigBuilder;
    use std::time::Duration;

    fn fp(tag: &str) -> Fingerprint {
        Fingerprint::of(&FingerprintKey {
            backend_id: "openai".into(),
            model_id: "gpt-x".into(),
            captured_context: tag.into(),
            language: "en".into(),
            request_kind: "suggestion".into(),
            prompt: None,
        })
        .unwrap()
    }

    fn fields(command: &str, kind: &str) -> KeyFields {
        KeyFields {
            command: command.to_string(),
            stderr: String::new(),
            exit_code: 0,
            prompt: String::new(),
            request_kind: kind.to_string(),
        }
    }

    async fn manager(dir: &std::path::Path) -> CacheManager {
        let l1 = MemoryCache::new(L1ConfigBuilder::new().capacity(100).default_ttl(Duration::from_secs(600)).build());
        let l2 = FileCache::new(L2ConfigBuilder::new().cache_dir(dir).default_ttl(Duration::from_secs(600)).build())
            .await
            .unwrap();
        let layered = Arc::new(LayeredCache::new(l1, Some(Arc::new(l2)), LayeredCacheConfigBuilder::new().build()));
        let sidecar = Arc::new(SimilaritySidecar::new(SimilarityConfigBuilder::new().threshold(0.7).build()));
        CacheManager::new(layered, sidecar, ManagerConfigBuilder::new().build())
    }

    #[tokio::test]
    async fn set_then_get_is_an_exact_hit() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path()).await;
        let key = fp("git push");
        manager
            .set(RequestKind::Suggestion, key.clone(), fields("git push", "suggestion"), "use --force-with-lease".to_string())
            .await
            .unwrap();

        let value = manager.get(RequestKind::Suggestion, &key, &fields("git push", "suggestion")).await.unwrap();
        assert_eq!(value, Some("use --force-with-lease".to_string()));
    }

    #[tokio::test]
    async fn similarity_fallback_promotes_into_layered_cache() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path()).await;
        let stored_key = fp("git push");
        manager
            .set(RequestKind::Suggestion, stored_key, fields("git push", "suggestion"), "use --force-with-lease".to_string())
            .await
            .unwrap();

        // A different fingerprint (the query text differs) but a near-miss
        // similarity query should still promote the sidecar hit into the
        // layered cache under the *query's* fingerprint.
        let query_key = fp("git push --set-upstream");
        let result = manager.get(RequestKind::Suggestion, &query_key, &fields("git push", "suggestion")).await.unwrap();
        assert_eq!(result, Some("use --force-with-lease".to_string()));

        let second = manager.get(RequestKind::Suggestion, &query_key, &fields("git push", "suggestion")).await.unwrap();
        assert_eq!(second, Some("use --force-with-lease".to_string()));
    }

    #[tokio::test]
    async fn invalidate_kind_only_clears_matching_entries() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path()).await;
        let suggestion_key = fp("git push");
        let command_key = fp("list files");

        manager
            .set(RequestKind::Suggestion, suggestion_key.clone(), fields("git push", "suggestion"), "A".to_string())
            .await
            .unwrap();
        manager
            .set(RequestKind::CommandGeneration, command_key.clone(), fields("list files", "command-generation"), "B".to_string())
            .await
            .unwrap();

        manager.invalidate(InvalidateTarget::Kind(RequestKind::Suggestion)).await.unwrap();

        assert_eq!(manager.get(RequestKind::Suggestion, &suggestion_key, &fields("git push", "suggestion")).await.unwrap(), None);
        assert_eq!(
            manager.get(RequestKind::CommandGeneration, &command_key, &fields("list files", "command-generation")).await.unwrap(),
            Some("B".to_string())
        );
    }

    #[tokio::test]
    async fn invalidate_all_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path()).await;
        let key = fp("git push");
        manager
            .set(RequestKind::Suggestion, key.clone(), fields("git push", "suggestion"), "A".to_string())
            .await
            .unwrap();

        manager.invalidate(InvalidateTarget::All).await.unwrap();
        assert_eq!(manager.get(RequestKind::Suggestion, &key, &fields("git push", "suggestion")).await.unwrap(), None);
    }
}
