//! Task identity and the typed work variants the dispatcher routes (§4.10).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use llmcache_core::{Captured, EnhancedCaptured};

/// `task_<unix_nanos>_<seq>`. Uniqueness is guaranteed by the monotonic
/// sequence, not the timestamp (two tasks minted in the same nanosecond are
/// still distinct).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints [`TaskId`]s with a process-wide monotonic sequence, so ids stay
/// unique even when the wall clock doesn't advance between two mintings.
pub struct TaskIdFactory {
    sequence: AtomicU64,
}

impl TaskIdFactory {
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
        }
    }

    pub fn next(&self) -> TaskId {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        TaskId(format!("task_{nanos}_{seq}"))
    }
}

impl Default for TaskIdFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// The work a call to [`crate::Dispatcher::process_remote`] asks a backend
/// to perform. Mirrors the four operations of the `Backend` contract (§6).
#[derive(Debug, Clone)]
pub enum RemoteKind {
    Suggestion(Captured),
    EnhancedSuggestion(EnhancedCaptured),
    GenerateCommand(String),
    VerifyConnection,
}

impl RemoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteKind::Suggestion(_) => "suggestion",
            RemoteKind::EnhancedSuggestion(_) => "enhanced-suggestion",
            RemoteKind::GenerateCommand(_) => "generate-command",
            RemoteKind::VerifyConnection => "verify-connection",
        }
    }
}

/// The cache operation a call to [`crate::Dispatcher::process_cache`] asks
/// the cache pool to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOp {
    Get,
    Set,
    Delete,
}
