//! Task groups: a set of tasks submitted across the dispatcher's pools and
//! awaited collectively with a shared deadline (§4.10, §9 glossary "task
//! group").
//!
//! A group's timeout supersedes per-task timeouts only for the group's own
//! completion signal — it does not cancel in-flight tasks beyond whatever
//! cooperative cancellation the pools already apply (§4.10).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use llmcache_core::{Backend, Fingerprint};
use tokio::sync::Notify;

use crate::dispatcher::{DispatchCallback, DispatchResult, Dispatcher};
use crate::error::{DispatcherError, Result};
use crate::task::{CacheOp, RemoteKind, TaskId};

struct GroupState {
    total: AtomicUsize,
    remaining: AtomicUsize,
    notify: Notify,
}

/// A set of tasks submitted through a shared [`Dispatcher`], awaited
/// collectively via [`TaskGroup::join`].
pub struct TaskGroup<'a> {
    dispatcher: &'a Dispatcher,
    id: String,
    timeout: Duration,
    state: Arc<GroupState>,
}

impl<'a> TaskGroup<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher, id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            dispatcher,
            id: id.into(),
            timeout,
            state: Arc::new(GroupState {
                total: AtomicUsize::new(0),
                remaining: AtomicUsize::new(0),
                notify: Notify::new(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of child tasks submitted so far.
    pub fn total(&self) -> usize {
        self.state.total.load(Ordering::SeqCst)
    }

    /// Number of child tasks whose callback has not yet fired.
    pub fn remaining(&self) -> usize {
        self.state.remaining.load(Ordering::SeqCst)
    }

    fn wrap(&self, callback: DispatchCallback) -> DispatchCallback {
        let state = Arc::clone(&self.state);
        Box::new(move |result| {
            callback(result);
            if state.remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                state.notify.notify_waiters();
            }
        })
    }

    fn untrack_on_failure(&self) {
        if self.state.remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.notify.notify_waiters();
        }
    }

    pub async fn process_remote(
        &self,
        backend: Arc<dyn Backend>,
        kind: RemoteKind,
        language: impl Into<String>,
        callback: DispatchCallback,
    ) -> Result<TaskId> {
        let wrapped = self.wrap(callback);
        self.state.total.fetch_add(1, Ordering::SeqCst);
        self.state.remaining.fetch_add(1, Ordering::SeqCst);
        match self.dispatcher.process_remote(backend, kind, language, wrapped).await {
            Ok(id) => Ok(id),
            Err(err) => {
                self.untrack_on_failure();
                Err(err)
            }
        }
    }

    pub async fn process_local(
        &self,
        kind: impl Into<String>,
        execute: llmcache_pool::BoxFuture<'static, DispatchResult>,
        callback: DispatchCallback,
    ) -> Result<TaskId> {
        let wrapped = self.wrap(callback);
        self.state.total.fetch_add(1, Ordering::SeqCst);
        self.state.remaining.fetch_add(1, Ordering::SeqCst);
        match self.dispatcher.process_local(kind, execute, wrapped).await {
            Ok(id) => Ok(id),
            Err(err) => {
                self.untrack_on_failure();
                Err(err)
            }
        }
    }

    pub async fn process_cache(
        &self,
        op: CacheOp,
        key: Fingerprint,
        original_key: String,
        value: Option<String>,
        ttl: Option<Duration>,
        callback: DispatchCallback,
    ) -> Result<TaskId> {
        let wrapped = self.wrap(callback);
        self.state.total.fetch_add(1, Ordering::SeqCst);
        self.state.remaining.fetch_add(1, Ordering::SeqCst);
        match self
            .dispatcher
            .process_cache(op, key, original_key, value, ttl, wrapped)
            .await
        {
            Ok(id) => Ok(id),
            Err(err) => {
                self.untrack_on_failure();
                Err(err)
            }
        }
    }

    /// Waits until every submitted child's callback has fired, or until the
    /// group's timeout elapses, whichever comes first. In-flight tasks are
    /// not forcibly aborted on timeout beyond their own pool's cancellation
    /// (§4.10).
    pub async fn join(self) -> Result<()> {
        let total = self.total();
        let state = Arc::clone(&self.state);
        let wait = async {
            loop {
                let notified = state.notify.notified();
                if state.remaining.load(Ordering::SeqCst) == 0 {
                    return;
                }
                notified.await;
            }
        };

        match tokio::time::timeout(self.timeout, wait).await {
            Ok(()) => Ok(()),
            Err(_) => Err(DispatcherError::GroupTimeout {
                id: self.id,
                remaining: self.state.remaining.load(Ordering::SeqCst),
                total,
            }),
        }
    }
}
