//! The `Backend` contract.
//!
//! A backend is an opaque collaborator that knows how to talk to one remote
//! (or local) language model. Everything about *how* it does that — wire
//! format, auth, model name mapping — lives outside this workspace; the
//! dispatcher and resilient client only ever see the four operations below.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Shell command/output captured for a suggestion request.
#[derive(Debug, Clone)]
pub struct Captured {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// [`Captured`] plus the extra shell context an "enhanced" suggestion uses.
#[derive(Debug, Clone)]
pub struct EnhancedCaptured {
    pub captured: Captured,
    pub recent_commands: Vec<String>,
    pub directory_listing: Vec<String>,
    pub working_directory: String,
    pub shell_type: String,
}

/// A backend's answer to a suggestion request.
///
/// Serialisable because callers that cache a `Suggestion` (the dispatcher's
/// remote pool, in this workspace) store it as the textual JSON payload the
/// layered cache expects, not as a typed value (§4.7).
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub explanation: String,
    pub corrected_command: String,
}

/// Error returned by a [`Backend`] call.
///
/// `retryable` records the classification the resilient client needs
/// (§7 of the design): network/timeout/server-class failures are
/// retryable, auth/malformed-request/not-found are not.
#[derive(Debug, Clone)]
pub struct BackendError {
    pub message: String,
    pub retryable: bool,
}

impl BackendError {
    pub fn retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn non_retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

/// An opaque remote or local language-model backend.
///
/// Injected into the dispatcher and resilient client as `Arc<dyn Backend>`;
/// the core never constructs a concrete implementation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Stable identifier used in fingerprints and per-host metrics keys.
    fn backend_id(&self) -> &str;

    async fn get_suggestion(
        &self,
        captured: &Captured,
        language: &str,
    ) -> Result<Suggestion, BackendError>;

    async fn get_enhanced_suggestion(
        &self,
        captured: &EnhancedCaptured,
        language: &str,
    ) -> Result<Suggestion, BackendError>;

    async fn generate_command(
        &self,
        prompt: &str,
        language: &str,
    ) -> Result<String, BackendError>;

    async fn verify_connection(&self) -> Result<Vec<String>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubBackend {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Backend for StubBackend {
        fn backend_id(&self) -> &str {
            "stub"
        }

        async fn get_suggestion(
            &self,
            _captured: &Captured,
            _language: &str,
        ) -> Result<Suggestion, BackendError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(Suggestion {
                explanation: "because".into(),
                corrected_command: "git push --force-with-lease".into(),
            })
        }

        async fn get_enhanced_suggestion(
            &self,
            captured: &EnhancedCaptured,
            language: &str,
        ) -> Result<Suggestion, BackendError> {
            self.get_suggestion(&captured.captured, language).await
        }

        async fn generate_command(
            &self,
            _prompt: &str,
            _language: &str,
        ) -> Result<String, BackendError> {
            Ok("ls -la".into())
        }

        async fn verify_connection(&self) -> Result<Vec<String>, BackendError> {
            Ok(vec!["stub-model".into()])
        }
    }

    #[tokio::test]
    async fn backend_trait_is_object_safe_and_callable() {
        let backend: std::sync::Arc<dyn Backend> = std::sync::Arc::new(StubBackend {
            calls: AtomicU32::new(0),
        });

        let captured = Captured {
            command: "git push".into(),
            stdout: String::new(),
            stderr: "rejected".into(),
            exit_code: 1,
        };
        let suggestion = backend.get_suggestion(&captured, "en").await.unwrap();
        assert_eq!(suggestion.corrected_command, "git push --force-with-lease");
    }

    #[test]
    fn backend_error_distinguishes_retryable() {
        let e = BackendError::retryable("timeout");
        assert!(e.retryable);
        let e = BackendError::non_retryable("unauthorized");
        assert!(!e.retryable);
    }
}
