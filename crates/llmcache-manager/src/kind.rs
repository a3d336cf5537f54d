//! The request kinds this manager distinguishes for TTL selection and
//! targeted invalidation (§4.7).

use std::fmt;
use std::time::Duration;

/// Mirrors [`llmcache_core::FingerprintKey::request_kind`] as a closed set
/// rather than a free-form string, so the manager can select a TTL and
/// route invalidation without string matching at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Suggestion,
    EnhancedSuggestion,
    CommandGeneration,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Suggestion => "suggestion",
            RequestKind::EnhancedSuggestion => "enhanced-suggestion",
            RequestKind::CommandGeneration => "command-generation",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind TTLs applied by [`crate::CacheManager::set`].
#[derive(Debug, Clone)]
pub struct TtlByKind {
    pub suggestion: Duration,
    pub enhanced_suggestion: Duration,
    pub command_generation: Duration,
}

impl Default for TtlByKind {
    fn default() -> Self {
        Self {
            suggestion: Duration::from_secs(3600),
            enhanced_suggestion: Duration::from_secs(1800),
            command_generation: Duration::from_secs(900),
        }
    }
}

impl TtlByKind {
    pub fn get(&self, kind: RequestKind) -> Duration {
        match kind {
            RequestKind::Suggestion => self.suggestion,
            RequestKind::EnhancedSuggestion => self.enhanced_suggestion,
            RequestKind::CommandGeneration => self.command_generation,
        }
    }
}
