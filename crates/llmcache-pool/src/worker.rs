//! Fixed-size worker pool draining a bounded FIFO task queue.

use crate::error::{PoolError, TimeoutError};
use crate::stats::{PoolStats, PoolStatsSnapshot};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "tracing")]
use tracing::debug;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A unit of work submitted to a [`WorkerPool`]: an `execute` thunk that
/// produces a boxed future, and a `callback` invoked with its outcome.
pub struct Task<O, E> {
    execute: Box<dyn FnOnce() -> BoxFuture<'static, Result<O, E>> + Send>,
    callback: Box<dyn FnOnce(Result<O, E>) + Send>,
}

impl<O, E> Task<O, E>
where
    O: Send + 'static,
    E: Send + 'static,
{
    pub fn new<F, Fut, C>(execute: F, callback: C) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        C: FnOnce(Result<O, E>) + Send + 'static,
    {
        Self {
            execute: Box::new(move || Box::pin(execute())),
            callback: Box::new(callback),
        }
    }
}

/// Construction parameters for [`WorkerPool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub worker_count: usize,
    pub queue_size: usize,
    pub default_timeout: Duration,
    pub enable_stats: bool,
    pub name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            queue_size: 256,
            default_timeout: Duration::from_secs(30),
            enable_stats: true,
            name: "pool".to_string(),
        }
    }
}

/// A fixed set of worker tasks draining a bounded FIFO queue. Each worker
/// applies `default_timeout` as a hard deadline around `execute`, then
/// invokes `callback` with the outcome.
pub struct WorkerPool<O, E> {
    name: String,
    sender: mpsc::Sender<Task<O, E>>,
    cancellation: CancellationToken,
    stats: Arc<PoolStats>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl<O, E> WorkerPool<O, E>
where
    O: Send + 'static,
    E: Send + 'static,
{
    pub fn new(config: PoolConfig) -> Self
    where
        E: TimeoutError,
    {
        let (sender, receiver) = mpsc::channel(config.queue_size.max(1));
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let cancellation = CancellationToken::new();
        let stats = Arc::new(PoolStats::new(config.enable_stats));

        let mut workers = Vec::with_capacity(config.worker_count);
        for _ in 0..config.worker_count {
            let receiver = Arc::clone(&receiver);
            let cancellation = cancellation.clone();
            let stats = Arc::clone(&stats);
            let default_timeout = config.default_timeout;
            let name = config.name.clone();
            workers.push(tokio::spawn(async move {
                worker_loop(receiver, cancellation, stats, default_timeout, name).await;
            }));
        }

        Self {
            name: config.name,
            sender,
            cancellation,
            stats,
            workers,
        }
    }

    /// Enqueues `task` without waiting. Returns `false` if the queue is
    /// currently full, pushing backpressure to the caller.
    pub fn submit(&self, task: Task<O, E>) -> bool {
        self.sender.try_send(task).is_ok()
    }

    /// Enqueues `task`, waiting up to `timeout` for room in the queue.
    pub async fn submit_with_timeout(&self, task: Task<O, E>, timeout: Duration) -> Result<(), PoolError> {
        match tokio::time::timeout(timeout, self.sender.send(task)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(PoolError::Closed {
                pool: self.name.clone(),
            }),
            Err(_) => Err(PoolError::EnqueueTimeout {
                pool: self.name.clone(),
            }),
        }
    }

    /// Number of tasks currently queued (a point-in-time snapshot of the
    /// channel's backlog).
    pub fn queue_size(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn stats(&self) -> PoolStatsSnapshot {
        self.stats.snapshot()
    }

    /// Stops accepting new work, waits up to `d` for in-flight tasks to
    /// finish, then cancels the shared cancellation token so any task
    /// cooperatively watching it can unwind.
    pub async fn shutdown(mut self, d: Duration) {
        drop(self.sender);
        let deadline = tokio::time::timeout(d, async {
            for worker in self.workers.drain(..) {
                let _ = worker.await;
            }
        });
        if deadline.await.is_err() {
            self.cancellation.cancel();
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }
}

async fn worker_loop<O, E>(
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<Task<O, E>>>>,
    cancellation: CancellationToken,
    stats: Arc<PoolStats>,
    default_timeout: Duration,
    #[allow(unused_variables)] pool_name: String,
) where
    O: Send + 'static,
    E: Send + 'static + TimeoutError,
{
    loop {
        let task = {
            let mut receiver = receiver.lock().await;
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => None,
                task = receiver.recv() => task,
            }
        };

        let Some(task) = task else {
            break;
        };

        let start = Instant::now();
        let outcome = tokio::time::timeout(default_timeout, (task.execute)()).await;
        let duration = start.elapsed();

        match outcome {
            Ok(result) => {
                stats.record(result.as_ref().map(|_| ()).map_err(|_| ()), duration);
                (task.callback)(result);
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                debug!(pool = %pool_name, "task exceeded default_timeout");
                stats.record(Err(()), duration);
                (task.callback)(Err(E::timed_out()));
            }
        }
    }
}
