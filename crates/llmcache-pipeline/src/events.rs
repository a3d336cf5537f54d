//! Events emitted by [`crate::Pipeline`] as data moves through its stages.

use llmcache_core::events::ResilienceEvent;
use std::time::Instant;

/// Events emitted while a [`crate::Pipeline`] runs a single item through its
/// stages.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    StageStarted {
        name: String,
        timestamp: Instant,
        stage: String,
    },
    StageCompleted {
        name: String,
        timestamp: Instant,
        stage: String,
    },
    StageFailed {
        name: String,
        timestamp: Instant,
        stage: String,
        message: String,
    },
    PipelineCompleted {
        name: String,
        timestamp: Instant,
    },
}

impl ResilienceEvent for PipelineEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PipelineEvent::StageStarted { .. } => "stage_started",
            PipelineEvent::StageCompleted { .. } => "stage_completed",
            PipelineEvent::StageFailed { .. } => "stage_failed",
            PipelineEvent::PipelineCompleted { .. } => "pipeline_completed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            PipelineEvent::StageStarted { timestamp, .. }
            | PipelineEvent::StageCompleted { timestamp, .. }
            | PipelineEvent::StageFailed { timestamp, .. }
            | PipelineEvent::PipelineCompleted { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            PipelineEvent::StageStarted { name, .. }
            | PipelineEvent::StageCompleted { name, .. }
            | PipelineEvent::StageFailed { name, .. }
            | PipelineEvent::PipelineCompleted { name, .. } => name,
        }
    }
}
