//! A single pipeline stage: serial stages run inline under a timeout,
//! parallel stages submit to their own worker pool (§4.9).

use crate::config::{StageConfig, StageKind};
use crate::error::PipelineError;
use crate::stats::{StageStats, StageStatsSnapshot};
use llmcache_pool::{PoolConfig, Task, TimeoutError, WorkerPool};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
type StageFn<T, E> = Arc<dyn Fn(T) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// One stage of a [`crate::Pipeline`].
pub struct Stage<T, E> {
    name: String,
    kind: StageKind,
    timeout: std::time::Duration,
    func: StageFn<T, E>,
    pool: Option<WorkerPool<T, E>>,
    stats: StageStats,
}

impl<T, E> Stage<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new<F, Fut>(config: StageConfig, func: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: TimeoutError,
    {
        let func: StageFn<T, E> = Arc::new(move |data| Box::pin(func(data)));
        let pool = match config.kind {
            StageKind::Serial => None,
            StageKind::Parallel => Some(WorkerPool::new(PoolConfig {
                worker_count: config.pool_workers,
                queue_size: config.pool_queue_size,
                default_timeout: config.timeout,
                enable_stats: false,
                name: config.name.clone(),
            })),
        };
        Self {
            name: config.name,
            kind: config.kind,
            timeout: config.timeout,
            func,
            pool,
            stats: StageStats::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> StageStatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn run(&self, data: T) -> Result<T, PipelineError<E>> {
        let start = Instant::now();
        let outcome = match self.kind {
            StageKind::Serial => self.run_serial(data).await,
            StageKind::Parallel => self.run_parallel(data).await,
        };
        self.stats.record(outcome.as_ref().map(|_| ()).map_err(|_| ()), start.elapsed());

        #[cfg(feature = "tracing")]
        if let Err(ref err) = outcome {
            tracing::debug!(stage = %self.name, error = %err, "pipeline stage failed");
        }
        #[cfg(feature = "metrics")]
        {
            let outcome_label = if outcome.is_ok() { "success" } else { "error" };
            metrics::counter!("llmcache_pipeline_stage_total", "stage" => self.name.clone(), "outcome" => outcome_label)
                .increment(1);
        }

        outcome
    }

    async fn run_serial(&self, data: T) -> Result<T, PipelineError<E>> {
        match tokio::time::timeout(self.timeout, (self.func)(data)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(source)) => Err(PipelineError::Stage {
                stage: self.name.clone(),
                source,
            }),
            Err(_) => Err(PipelineError::StageTimeout {
                stage: self.name.clone(),
            }),
        }
    }

    async fn run_parallel(&self, data: T) -> Result<T, PipelineError<E>> {
        let pool = self.pool.as_ref().expect("parallel stage always has a pool");
        let (tx, rx) = oneshot::channel();
        let func = Arc::clone(&self.func);
        let task = Task::new(move || (func)(data), move |result| {
            let _ = tx.send(result);
        });

        pool.submit_with_timeout(task, self.timeout)
            .await
            .map_err(|source| PipelineError::Pool {
                stage: self.name.clone(),
                source,
            })?;

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(Ok(result))) => Ok(result),
            Ok(Ok(Err(source))) => Err(PipelineError::Stage {
                stage: self.name.clone(),
                source,
            }),
            Ok(Err(_)) | Err(_) => Err(PipelineError::StageTimeout {
                stage: self.name.clone(),
            }),
        }
    }
}
