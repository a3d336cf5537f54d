//! Ordered composition of [`Stage`]s, folding a single item through each in
//! turn, with a bounded-concurrency batch variant (§4.9).

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::events::PipelineEvent;
use crate::stage::Stage;
use crate::stats::{PipelineStats, PipelineStatsSnapshot, StageStatsSnapshot};
use llmcache_core::events::EventListeners;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// An ordered list of stages a value is folded through.
pub struct Pipeline<T, E> {
    name: String,
    stages: Vec<Stage<T, E>>,
    batch_concurrency: usize,
    stats: PipelineStats,
    listeners: EventListeners<PipelineEvent>,
}

impl<T, E> Pipeline<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new(config: PipelineConfig, stages: Vec<Stage<T, E>>) -> Self {
        Self {
            name: config.name,
            stages,
            batch_concurrency: config.batch_concurrency,
            stats: PipelineStats::new(),
            listeners: EventListeners::new(),
        }
    }

    pub fn listeners_mut(&mut self) -> &mut EventListeners<PipelineEvent> {
        &mut self.listeners
    }

    pub fn stats(&self) -> PipelineStatsSnapshot {
        self.stats.snapshot()
    }

    /// Per-stage stats, in stage order.
    pub fn stage_stats(&self) -> Vec<(String, StageStatsSnapshot)> {
        self.stages.iter().map(|s| (s.name().to_string(), s.stats())).collect()
    }

    /// Folds `data` through every stage in order. The first stage error
    /// aborts the pipeline and is returned; prior stages' transformations
    /// are discarded along with it (§4.9).
    pub async fn process(&self, mut data: T) -> Result<T, PipelineError<E>> {
        if self.stages.is_empty() {
            return Err(PipelineError::Empty);
        }

        let start = Instant::now();
        for stage in &self.stages {
            self.listeners.emit(&PipelineEvent::StageStarted {
                name: self.name.clone(),
                timestamp: Instant::now(),
                stage: stage.name().to_string(),
            });

            data = match stage.run(data).await {
                Ok(result) => {
                    self.listeners.emit(&PipelineEvent::StageCompleted {
                        name: self.name.clone(),
                        timestamp: Instant::now(),
                        stage: stage.name().to_string(),
                    });
                    result
                }
                Err(err) => {
                    self.listeners.emit(&PipelineEvent::StageFailed {
                        name: self.name.clone(),
                        timestamp: Instant::now(),
                        stage: stage.name().to_string(),
                        message: err.to_string(),
                    });
                    self.stats.record(Err(()), start.elapsed());
                    return Err(err);
                }
            };
        }

        self.stats.record(Ok(()), start.elapsed());
        self.listeners.emit(&PipelineEvent::PipelineCompleted {
            name: self.name.clone(),
            timestamp: Instant::now(),
        });
        Ok(data)
    }

    /// Runs `process` over every item with a fixed concurrency ceiling.
    /// Results are positionally aligned with `items`; a per-item error does
    /// not abort sibling items (§4.9).
    pub async fn process_batch(&self, items: Vec<T>) -> Vec<Result<T, PipelineError<E>>> {
        let semaphore = Arc::new(Semaphore::new(self.batch_concurrency));
        let futures = items.into_iter().map(|item| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
                self.process(item).await
            }
        });

        futures::future::join_all(futures).await
    }
}
