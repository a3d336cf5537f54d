//! Events emitted by [`crate::Dispatcher`] as it routes tasks.

use llmcache_core::events::ResilienceEvent;
use std::time::Instant;

/// Events emitted as the dispatcher submits and completes tasks.
#[derive(Debug, Clone)]
pub enum DispatcherEvent {
    TaskSubmitted {
        name: String,
        timestamp: Instant,
        task_id: String,
        pool: String,
    },
    TaskCompleted {
        name: String,
        timestamp: Instant,
        task_id: String,
        pool: String,
    },
    TaskFailed {
        name: String,
        timestamp: Instant,
        task_id: String,
        pool: String,
        message: String,
    },
    GroupTimedOut {
        name: String,
        timestamp: Instant,
        group_id: String,
        remaining: usize,
    },
}

impl ResilienceEvent for DispatcherEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DispatcherEvent::TaskSubmitted { .. } => "task_submitted",
            DispatcherEvent::TaskCompleted { .. } => "task_completed",
            DispatcherEvent::TaskFailed { .. } => "task_failed",
            DispatcherEvent::GroupTimedOut { .. } => "group_timed_out",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            DispatcherEvent::TaskSubmitted { timestamp, .. }
            | DispatcherEvent::TaskCompleted { timestamp, .. }
            | DispatcherEvent::TaskFailed { timestamp, .. }
            | DispatcherEvent::GroupTimedOut { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            DispatcherEvent::TaskSubmitted { name, .. }
            | DispatcherEvent::TaskCompleted { name, .. }
            | DispatcherEvent::TaskFailed { name, .. }
            | DispatcherEvent::GroupTimedOut { name, .. } => name,
        }
    }
}
