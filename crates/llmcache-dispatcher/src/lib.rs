//! Routes typed work to three priority worker pools — remote-model, local,
//! cache — and coordinates groups of tasks awaited with a shared deadline
//! (§4.10).
//!
//! Built on [`llmcache_pool::PriorityWorkerPool`] for queueing,
//! [`llmcache_client::ResilientClient`] for the actual remote call, and
//! [`llmcache_cache::LayeredCache`] for cache-pool operations — this crate
//! is the thin routing layer that ties those three together the way the
//! dependency order in the design's overview table intends.
//!
//! ```no_run
//! use llmcache_cache::{FileCache, L1ConfigBuilder, L2ConfigBuilder, LayeredCache, LayeredCacheConfigBuilder, MemoryCache};
//! use llmcache_dispatcher::{CacheOp, Dispatcher, DispatcherConfigBuilder, RemoteKind};
//! use llmcache_core::{Backend, Captured};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example(backend: Arc<dyn Backend>) -> Result<(), Box<dyn std::error::Error>> {
//! let l1 = MemoryCache::new(L1ConfigBuilder::new().build());
//! let layered = Arc::new(LayeredCache::new(l1, None, LayeredCacheConfigBuilder::new().build()));
//! let dispatcher = Dispatcher::new(layered, DispatcherConfigBuilder::new().build());
//!
//! let captured = Captured { command: "git push".into(), stdout: String::new(), stderr: "rejected".into(), exit_code: 1 };
//! dispatcher
//!     .process_remote(backend, RemoteKind::Suggestion(captured), "en", Box::new(|_result| {}))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatcher;
mod error;
mod events;
mod group;
mod task;

pub use config::{priority, DispatcherConfig, DispatcherConfigBuilder};
pub use dispatcher::{DispatchCallback, DispatchResult, Dispatcher};
pub use error::{DispatcherError, Result};
pub use events::DispatcherEvent;
pub use group::TaskGroup;
pub use task::{CacheOp, RemoteKind, TaskId, TaskIdFactory};
