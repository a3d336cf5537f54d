//! A plain LRU over compiled prompt templates.
//!
//! Template source files and their rendering are an external collaborator's
//! concern; this only memoizes the already-compiled form keyed by template
//! name, the same way [`llmcache_cache::MemoryCache`] memoizes responses.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// LRU cache of compiled templates, keyed by template name.
pub struct TemplateCache {
    inner: Mutex<LruCache<String, String>>,
}

impl TemplateCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap())),
        }
    }

    /// Returns the compiled template for `name`, touching its recency.
    pub fn get(&self, name: &str) -> Option<String> {
        self.inner.lock().unwrap().get(name).cloned()
    }

    /// Inserts or replaces the compiled form of `name`.
    pub fn set(&self, name: impl Into<String>, compiled: impl Into<String>) {
        self.inner.lock().unwrap().push(name.into(), compiled.into());
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_after_set_returns_compiled_form() {
        let cache = TemplateCache::new(2);
        cache.set("suggestion", "compiled-suggestion-template");
        assert_eq!(cache.get("suggestion"), Some("compiled-suggestion-template".to_string()));
    }

    #[test]
    fn lru_eviction_drops_least_recently_used() {
        let cache = TemplateCache::new(2);
        cache.set("a", "A");
        cache.set("b", "B");
        cache.get("a");
        cache.set("c", "C");
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some("A".to_string()));
        assert_eq!(cache.get("c"), Some("C".to_string()));
    }

    #[test]
    fn missing_template_is_none() {
        let cache = TemplateCache::new(2);
        assert_eq!(cache.get("missing"), None);
    }
}
