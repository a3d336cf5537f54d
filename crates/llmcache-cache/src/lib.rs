//! The response cache tiers: an in-process LRU (L1), a persistent
//! file-backed store (L2), and a [`LayeredCache`] composing the two with
//! promotion and write-through (spec §4.3-§4.5).
//!
//! # Example
//!
//! ```no_run
//! use llmcache_cache::{FileCache, L1ConfigBuilder, L2ConfigBuilder, LayeredCache, LayeredCacheConfigBuilder, MemoryCache};
//! use llmcache_core::{Fingerprint, FingerprintKey};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let l1 = MemoryCache::new(L1ConfigBuilder::new().capacity(1000).build());
//! let l2 = FileCache::new(L2ConfigBuilder::new().cache_dir("/tmp/llmcache-example").build()).await?;
//! let cache = LayeredCache::new(l1, Some(Arc::new(l2)), LayeredCacheConfigBuilder::new().build());
//!
//! let key = Fingerprint::of(&FingerprintKey {
//!     backend_id: "openai".into(),
//!     model_id: "gpt-x".into(),
//!     captured_context: "git status".into(),
//!     language: "en".into(),
//!     request_kind: "suggestion".into(),
//!     prompt: None,
//! }).unwrap();
//!
//! cache.set(key.clone(), "git status", "try `git status -sb`".to_string(), Duration::from_secs(600)).await?;
//! assert_eq!(cache.get(&key).await, Some("try `git status -sb`".to_string()));
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod events;
mod l1;
mod l2;
mod layered;
mod stats;

pub use config::{
    L1Config, L1ConfigBuilder, L2Config, L2ConfigBuilder, LayeredCacheConfig,
    LayeredCacheConfigBuilder,
};
pub use error::{CacheError, Result};
pub use events::{CacheEvent, Tier};
pub use l1::{MemoryCache, MemoryEntry};
pub use l2::{CacheEntry, FileCache};
pub use layered::LayeredCache;
pub use stats::{CacheStats, CacheStatsSnapshot};
