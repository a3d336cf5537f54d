//! Bounded pool of reusable resources with borrow-or-wait semantics.
//!
//! Modeled on the semaphore-gated waiting the teacher workspace's bulkhead
//! service used for call admission, generalized here to hand back an actual
//! pooled value instead of just a permit.

use crate::error::GovernorError;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Duration;

/// A bounded pool of reusable `T` values, created lazily via `factory` up to
/// `capacity` and recycled via `cleanup` when returned.
pub struct ResourcePool<T> {
    name: String,
    semaphore: Arc<Semaphore>,
    idle: Arc<Mutex<Vec<T>>>,
    factory: Arc<dyn Fn() -> T + Send + Sync>,
    cleanup: Arc<dyn Fn(&mut T) + Send + Sync>,
    max_wait: Option<Duration>,
}

impl<T: Send + 'static> ResourcePool<T> {
    pub fn new<F, C>(name: impl Into<String>, capacity: usize, factory: F, cleanup: C) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        C: Fn(&mut T) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            semaphore: Arc::new(Semaphore::new(capacity)),
            idle: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            factory: Arc::new(factory),
            cleanup: Arc::new(cleanup),
            max_wait: None,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Borrows a resource, waiting for capacity if the pool is exhausted.
    /// Waits at most `max_wait` (if configured) before returning
    /// [`GovernorError::Cancelled`].
    pub async fn borrow(&self) -> Result<PooledResource<T>, GovernorError> {
        let permit = match self.max_wait {
            Some(wait) => tokio::time::timeout(wait, self.semaphore.clone().acquire_owned())
                .await
                .map_err(|_| GovernorError::Cancelled {
                    pool: self.name.clone(),
                })?
                .expect("semaphore never closed"),
            None => self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore never closed"),
        };

        let value = {
            let mut idle = self.idle.lock().await;
            idle.pop()
        }
        .unwrap_or_else(|| (self.factory)());

        Ok(PooledResource {
            value: Some(value),
            idle: Arc::clone(&self.idle),
            cleanup: Arc::clone(&self.cleanup),
            _permit: permit,
        })
    }

    /// Number of permits currently available (not borrowed).
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A resource on loan from a [`ResourcePool`]. Returned to the pool's idle
/// list, after running `cleanup`, when dropped.
pub struct PooledResource<T> {
    value: Option<T>,
    idle: Arc<Mutex<Vec<T>>>,
    cleanup: Arc<dyn Fn(&mut T) + Send + Sync>,
    _permit: tokio::sync::OwnedSemaphorePermit,
}

impl<T> std::ops::Deref for PooledResource<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("value taken only on drop")
    }
}

impl<T> std::ops::DerefMut for PooledResource<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("value taken only on drop")
    }
}

impl<T> Drop for PooledResource<T> {
    fn drop(&mut self) {
        if let Some(mut value) = self.value.take() {
            (self.cleanup)(&mut value);
            if let Ok(mut idle) = self.idle.try_lock() {
                idle.push(value);
            }
        }
    }
}
