use llmcache_core::events::ResilienceEvent;
use std::time::{Duration, Instant};

/// Events emitted by the time limiter middleware.
#[derive(Debug, Clone)]
pub enum TimeLimiterEvent {
    /// The inner call completed before the timeout elapsed.
    Success {
        pattern_name: String,
        timestamp: Instant,
        duration: Duration,
    },
    /// The inner call returned an error before the timeout elapsed.
    Error {
        pattern_name: String,
        timestamp: Instant,
        duration: Duration,
    },
    /// The inner call did not complete within `timeout_duration`.
    Timeout {
        pattern_name: String,
        timestamp: Instant,
        timeout_duration: Duration,
    },
}

impl ResilienceEvent for TimeLimiterEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TimeLimiterEvent::Success { .. } => "Success",
            TimeLimiterEvent::Error { .. } => "Error",
            TimeLimiterEvent::Timeout { .. } => "Timeout",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            TimeLimiterEvent::Success { timestamp, .. }
            | TimeLimiterEvent::Error { timestamp, .. }
            | TimeLimiterEvent::Timeout { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            TimeLimiterEvent::Success { pattern_name, .. }
            | TimeLimiterEvent::Error { pattern_name, .. }
            | TimeLimiterEvent::Timeout { pattern_name, .. } => pattern_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_and_accessors() {
        let now = Instant::now();
        let success = TimeLimiterEvent::Success {
            pattern_name: "t".into(),
            timestamp: now,
            duration: Duration::from_millis(5),
        };
        assert_eq!(success.event_type(), "Success");
        assert_eq!(success.pattern_name(), "t");

        let timeout = TimeLimiterEvent::Timeout {
            pattern_name: "t".into(),
            timestamp: now,
            timeout_duration: Duration::from_secs(1),
        };
        assert_eq!(timeout.event_type(), "Timeout");
    }
}
