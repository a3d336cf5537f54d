//! Routes typed work to three worker pools (§4.10): remote-model, local,
//! cache. Each pool is a [`llmcache_pool::PriorityWorkerPool`] so fairness
//! across priority bands is preserved per pool; the pools themselves run at
//! the concurrency their workload calls for (§4.10, `DispatcherConfig`).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use llmcache_cache::LayeredCache;
use llmcache_client::{ClientConfig, ResilientClient};
use llmcache_core::events::EventListeners;
use llmcache_core::{Backend, Fingerprint};
use llmcache_pool::{BoxFuture, PriorityWorkerPool, Task};
use tokio::sync::Mutex as AsyncMutex;

use crate::config::{priority, DispatcherConfig};
use crate::error::{DispatcherError, Result};
use crate::events::DispatcherEvent;
use crate::group::TaskGroup;
use crate::task::{CacheOp, RemoteKind, TaskId, TaskIdFactory};

/// The textual outcome of a dispatched task, or the error it failed with.
/// Every pool this crate hosts shares this output type (§4.7: "entries
/// stored in the layered cache are always textual" extends naturally to
/// every producer of cacheable payloads).
pub type DispatchResult = std::result::Result<String, DispatcherError>;

/// A one-shot completion sink invoked with a task's [`DispatchResult`].
pub type DispatchCallback = Box<dyn FnOnce(DispatchResult) + Send>;

type ClientRegistry = Arc<AsyncMutex<HashMap<String, Arc<ResilientClient>>>>;

/// Hosts the three worker pools and coordinates task groups across them
/// (§4.10).
pub struct Dispatcher {
    name: String,
    remote_pool: PriorityWorkerPool<String, DispatcherError>,
    local_pool: PriorityWorkerPool<String, DispatcherError>,
    cache_pool: PriorityWorkerPool<String, DispatcherError>,
    clients: ClientRegistry,
    client_config: ClientConfig,
    cache: Arc<LayeredCache>,
    ids: TaskIdFactory,
    listeners: EventListeners<DispatcherEvent>,
}

impl Dispatcher {
    pub fn new(cache: Arc<LayeredCache>, config: DispatcherConfig) -> Self {
        Self {
            name: "dispatcher".to_string(),
            remote_pool: PriorityWorkerPool::new(config.remote_pool),
            local_pool: PriorityWorkerPool::new(config.local_pool),
            cache_pool: PriorityWorkerPool::new(config.cache_pool),
            clients: Arc::new(AsyncMutex::new(HashMap::new())),
            client_config: config.client,
            cache,
            ids: TaskIdFactory::new(),
            listeners: EventListeners::new(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: llmcache_core::events::EventListener<DispatcherEvent> + 'static,
    {
        self.listeners.add(listener);
    }

    /// Stats for the remote-model, local and cache pools, in that order.
    pub fn pool_stats(&self) -> [llmcache_pool::PoolStatsSnapshot; 3] {
        [self.remote_pool.stats(), self.local_pool.stats(), self.cache_pool.stats()]
    }

    /// Builds a task for `kind` and submits it to the remote-model pool at
    /// medium priority (§4.10).
    pub async fn process_remote(
        &self,
        backend: Arc<dyn Backend>,
        kind: RemoteKind,
        language: impl Into<String>,
        callback: DispatchCallback,
    ) -> Result<TaskId> {
        let language = language.into();
        let task_id = self.ids.next();
        let clients = Arc::clone(&self.clients);
        let client_config = self.client_config.clone();

        let execute: BoxFuture<'static, DispatchResult> = Box::pin(async move {
            let id = backend.backend_id().to_string();
            let client = {
                let mut guard = clients.lock().await;
                if let Some(existing) = guard.get(&id) {
                    Arc::clone(existing)
                } else {
                    let mut cfg = client_config.clone();
                    cfg.name = id.clone();
                    let client = Arc::new(ResilientClient::new(backend, cfg));
                    guard.insert(id, Arc::clone(&client));
                    client
                }
            };

            let payload = match kind {
                RemoteKind::Suggestion(captured) => {
                    let suggestion = client.get_suggestion(&captured, &language).await?;
                    serde_json::to_string(&suggestion).expect("Suggestion always serialises")
                }
                RemoteKind::EnhancedSuggestion(captured) => {
                    let suggestion = client.get_enhanced_suggestion(&captured, &language).await?;
                    serde_json::to_string(&suggestion).expect("Suggestion always serialises")
                }
                RemoteKind::GenerateCommand(prompt) => client.generate_command(&prompt, &language).await?,
                RemoteKind::VerifyConnection => {
                    let models = client.verify_connection().await?;
                    serde_json::to_string(&models).expect("Vec<String> always serialises")
                }
            };
            Ok(payload)
        });

        let task = Task::new(move || execute, callback);
        self.remote_pool
            .submit(task, priority::REMOTE)
            .await
            .map(|()| task_id)
            .map_err(DispatcherError::from)
    }

    /// Submits `execute` to the local pool at low priority (§4.10). `kind`
    /// is carried only for task identification; the dispatcher has no
    /// built-in local operations, those live with whatever collaborator
    /// supplies `execute`.
    pub async fn process_local(
        &self,
        kind: impl Into<String>,
        execute: BoxFuture<'static, DispatchResult>,
        callback: DispatchCallback,
    ) -> Result<TaskId> {
        let _kind = kind.into();
        let task_id = self.ids.next();
        let task = Task::new(move || execute, callback);
        self.local_pool
            .submit(task, priority::LOCAL)
            .await
            .map(|()| task_id)
            .map_err(DispatcherError::from)
    }

    /// Submits a cache `op` against the dispatcher's [`LayeredCache`] to the
    /// cache pool at the lowest priority (§4.10).
    pub async fn process_cache(
        &self,
        op: CacheOp,
        key: Fingerprint,
        original_key: String,
        value: Option<String>,
        ttl: Option<Duration>,
        callback: DispatchCallback,
    ) -> Result<TaskId> {
        let task_id = self.ids.next();
        let cache = Arc::clone(&self.cache);

        let execute: BoxFuture<'static, DispatchResult> = Box::pin(async move {
            match op {
                CacheOp::Get => Ok(cache.get(&key).await.unwrap_or_default()),
                CacheOp::Set => {
                    let value = value.ok_or(DispatcherError::InvalidCacheOp {
                        op: "set",
                        what: "value",
                    })?;
                    let ttl = ttl.ok_or(DispatcherError::InvalidCacheOp {
                        op: "set",
                        what: "ttl",
                    })?;
                    cache.set(key, original_key, value, ttl).await?;
                    Ok(String::new())
                }
                CacheOp::Delete => {
                    cache.delete(&key).await;
                    Ok(String::new())
                }
            }
        });

        let task = Task::new(move || execute, callback);
        self.cache_pool
            .submit(task, priority::CACHE)
            .await
            .map(|()| task_id)
            .map_err(DispatcherError::from)
    }

    /// Collects a new [`TaskGroup`] that submits through this dispatcher.
    pub fn create_task_group(&self, id: impl Into<String>, timeout: Duration) -> TaskGroup<'_> {
        TaskGroup::new(self, id, timeout)
    }

    /// Stops accepting new work on every pool and waits up to `d` for
    /// in-flight tasks, per pool, to finish (§4.8 `shutdown`).
    pub async fn shutdown(self, d: Duration) {
        self.remote_pool.shutdown(d).await;
        self.local_pool.shutdown(d).await;
        self.cache_pool.shutdown(d).await;
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
