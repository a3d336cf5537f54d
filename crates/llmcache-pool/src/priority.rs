//! Priority-ordered variant of [`crate::WorkerPool`].
//!
//! Tasks are kept in a single `Vec` ordered by descending priority so
//! workers always pull the highest-priority item. Insertion is O(n); use
//! this variant only where fairness across priorities matters more than raw
//! throughput, per the plain FIFO [`crate::WorkerPool`] otherwise.

use crate::error::{PoolError, TimeoutError};
use crate::stats::{PoolStats, PoolStatsSnapshot};
use crate::worker::{BoxFuture, PoolConfig, Task};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Notify};
use tokio_util::sync::CancellationToken;

struct PrioritizedTask<O, E> {
    priority: i32,
    task: Task<O, E>,
}

/// A worker pool whose queue is ordered by caller-supplied priority rather
/// than strict FIFO arrival order.
pub struct PriorityWorkerPool<O, E> {
    name: String,
    queue: Arc<Mutex<VecDeque<PrioritizedTask<O, E>>>>,
    queue_capacity: usize,
    notify: Arc<Notify>,
    cancellation: CancellationToken,
    stats: Arc<PoolStats>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl<O, E> PriorityWorkerPool<O, E>
where
    O: Send + 'static,
    E: Send + 'static,
{
    pub fn new(config: PoolConfig) -> Self
    where
        E: TimeoutError,
    {
        let queue: Arc<Mutex<VecDeque<PrioritizedTask<O, E>>>> =
            Arc::new(Mutex::new(VecDeque::with_capacity(config.queue_size)));
        let notify = Arc::new(Notify::new());
        let cancellation = CancellationToken::new();
        let stats = Arc::new(PoolStats::new(config.enable_stats));

        let mut workers = Vec::with_capacity(config.worker_count);
        for _ in 0..config.worker_count {
            let queue = Arc::clone(&queue);
            let notify = Arc::clone(&notify);
            let cancellation = cancellation.clone();
            let stats = Arc::clone(&stats);
            let default_timeout = config.default_timeout;
            workers.push(tokio::spawn(async move {
                worker_loop(queue, notify, cancellation, stats, default_timeout).await;
            }));
        }

        Self {
            name: config.name,
            queue,
            queue_capacity: config.queue_size,
            notify,
            cancellation,
            stats,
            workers,
        }
    }

    /// Inserts `task` in descending-priority order. Returns
    /// [`PoolError::QueueFull`] if the queue is already at capacity.
    pub async fn submit(&self, task: Task<O, E>, priority: i32) -> Result<(), PoolError> {
        let mut queue = self.queue.lock().await;
        if queue.len() >= self.queue_capacity {
            return Err(PoolError::QueueFull {
                pool: self.name.clone(),
            });
        }
        let position = queue
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(queue.len());
        queue.insert(position, PrioritizedTask { priority, task });
        drop(queue);
        self.notify.notify_one();
        Ok(())
    }

    pub async fn queue_size(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub fn stats(&self) -> PoolStatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn shutdown(mut self, d: Duration) {
        self.cancellation.cancel();
        self.notify.notify_waiters();
        let deadline = tokio::time::timeout(d, async {
            for worker in self.workers.drain(..) {
                let _ = worker.await;
            }
        });
        deadline.await.ok();
    }
}

async fn worker_loop<O, E>(
    queue: Arc<Mutex<VecDeque<PrioritizedTask<O, E>>>>,
    notify: Arc<Notify>,
    cancellation: CancellationToken,
    stats: Arc<PoolStats>,
    default_timeout: Duration,
) where
    O: Send + 'static,
    E: Send + 'static + TimeoutError,
{
    loop {
        let popped = {
            let mut queue = queue.lock().await;
            queue.pop_front()
        };

        let prioritized = match popped {
            Some(task) => task,
            None => {
                if cancellation.is_cancelled() {
                    break;
                }
                tokio::select! {
                    biased;
                    _ = cancellation.cancelled() => break,
                    _ = notify.notified() => continue,
                }
            }
        };

        let execute_future: BoxFuture<'static, _> = (prioritized.task.execute)();
        let start = Instant::now();
        let outcome = tokio::time::timeout(default_timeout, execute_future).await;
        let duration = start.elapsed();

        match outcome {
            Ok(result) => {
                stats.record(result.as_ref().map(|_| ()).map_err(|_| ()), duration);
                (prioritized.task.callback)(result);
            }
            Err(_) => {
                stats.record(Err(()), duration);
                (prioritized.task.callback)(Err(E::timed_out()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::Task;
    use std::sync::Mutex as StdMutex;

    fn config(worker_count: usize, queue_size: usize) -> PoolConfig {
        PoolConfig {
            worker_count,
            queue_size,
            default_timeout: Duration::from_secs(5),
            enable_stats: true,
            name: "priority-pool".to_string(),
        }
    }

    #[tokio::test]
    async fn higher_priority_tasks_run_before_lower_priority_ones() {
        let pool: PriorityWorkerPool<i32, ()> = PriorityWorkerPool::new(config(0, 16));
        let observed = Arc::new(StdMutex::new(Vec::new()));

        for (value, priority) in [(1, 0), (2, 10), (3, 5)] {
            let observed = Arc::clone(&observed);
            let task = Task::new(
                move || async move { Ok::<i32, ()>(value) },
                move |_| {
                    observed.lock().unwrap().push(value);
                },
            );
            pool.submit(task, priority).await.unwrap();
        }

        let queue = pool.queue.lock().await;
        let priorities: Vec<i32> = queue.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![10, 5, 0]);
    }

    #[tokio::test]
    async fn submit_rejects_when_queue_is_at_capacity() {
        let pool: PriorityWorkerPool<i32, ()> = PriorityWorkerPool::new(config(0, 1));
        let task1 = Task::new(|| async { Ok(1) }, |_| {});
        let task2 = Task::new(|| async { Ok(2) }, |_| {});
        assert!(pool.submit(task1, 0).await.is_ok());
        assert!(matches!(
            pool.submit(task2, 0).await,
            Err(PoolError::QueueFull { .. })
        ));
    }

    #[tokio::test]
    async fn task_exceeding_default_timeout_still_invokes_callback() {
        let pool: PriorityWorkerPool<i32, &'static str> = PriorityWorkerPool::new(PoolConfig {
            default_timeout: Duration::from_millis(10),
            ..config(1, 4)
        });
        let (tx, rx) = tokio::sync::oneshot::channel();
        let task = Task::new(
            || async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(1)
            },
            move |result| {
                let _ = tx.send(result);
            },
        );
        pool.submit(task, 0).await.unwrap();
        let result = rx.await.unwrap();
        assert_eq!(result, Err("task timed out"));
        assert_eq!(pool.stats().failed, 1);
        pool.shutdown(Duration::from_secs(1)).await;
    }
}
