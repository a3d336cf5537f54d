//! Adapts the `Backend` trait (four async methods) onto a single
//! `tower::Service<BackendRequest>`, which is what the retry/circuit-breaker
//! /timelimiter layers need to stack around.

use futures::future::BoxFuture;
use llmcache_core::{Backend, BackendError, Captured, EnhancedCaptured, Suggestion};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

/// One of the four operations a [`Backend`] exposes, bundled as a single
/// request value so it can flow through a uniform `Service`.
#[derive(Debug, Clone)]
pub enum BackendRequest {
    Suggestion {
        captured: Captured,
        language: String,
    },
    EnhancedSuggestion {
        captured: EnhancedCaptured,
        language: String,
    },
    GenerateCommand {
        prompt: String,
        language: String,
    },
    VerifyConnection,
}

/// The matching response for whichever [`BackendRequest`] variant was sent.
#[derive(Debug, Clone)]
pub enum BackendResponse {
    Suggestion(Suggestion),
    Command(String),
    Models(Vec<String>),
}

impl BackendResponse {
    pub fn into_suggestion(self) -> Option<Suggestion> {
        match self {
            BackendResponse::Suggestion(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_command(self) -> Option<String> {
        match self {
            BackendResponse::Command(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_models(self) -> Option<Vec<String>> {
        match self {
            BackendResponse::Models(m) => Some(m),
            _ => None,
        }
    }
}

/// A [`tower::Service`] wrapping a single `Arc<dyn Backend>`. One attempt,
/// no retry/circuit-breaking of its own — those are applied as outer layers
/// by [`crate::ResilientClient`].
#[derive(Clone)]
pub struct BackendService {
    backend: Arc<dyn Backend>,
}

impl BackendService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend_id(&self) -> &str {
        self.backend.backend_id()
    }
}

impl Service<BackendRequest> for BackendService {
    type Response = BackendResponse;
    type Error = BackendError;
    type Future = BoxFuture<'static, Result<BackendResponse, BackendError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BackendRequest) -> Self::Future {
        let backend = Arc::clone(&self.backend);
        Box::pin(async move {
            match req {
                BackendRequest::Suggestion { captured, language } => backend
                    .get_suggestion(&captured, &language)
                    .await
                    .map(BackendResponse::Suggestion),
                BackendRequest::EnhancedSuggestion { captured, language } => backend
                    .get_enhanced_suggestion(&captured, &language)
                    .await
                    .map(BackendResponse::Suggestion),
                BackendRequest::GenerateCommand { prompt, language } => backend
                    .generate_command(&prompt, &language)
                    .await
                    .map(BackendResponse::Command),
                BackendRequest::VerifyConnection => backend
                    .verify_connection()
                    .await
                    .map(BackendResponse::Models),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubBackend;

    #[async_trait]
    impl Backend for StubBackend {
        fn backend_id(&self) -> &str {
            "stub"
        }

        async fn get_suggestion(&self, _c: &Captured, _l: &str) -> Result<Suggestion, BackendError> {
            Ok(Suggestion {
                explanation: "e".into(),
                corrected_command: "c".into(),
            })
        }

        async fn get_enhanced_suggestion(
            &self,
            _c: &EnhancedCaptured,
            _l: &str,
        ) -> Result<Suggestion, BackendError> {
            Ok(Suggestion {
                explanation: "e".into(),
                corrected_command: "c".into(),
            })
        }

        async fn generate_command(&self, _p: &str, _l: &str) -> Result<String, BackendError> {
            Ok("ls".into())
        }

        async fn verify_connection(&self) -> Result<Vec<String>, BackendError> {
            Ok(vec!["m1".into()])
        }
    }

    #[tokio::test]
    async fn dispatches_to_matching_backend_method() {
        let mut svc = BackendService::new(Arc::new(StubBackend));
        let resp = svc
            .call(BackendRequest::GenerateCommand {
                prompt: "x".into(),
                language: "en".into(),
            })
            .await
            .unwrap();
        assert_eq!(resp.into_command(), Some("ls".to_string()));

        let mut svc = BackendService::new(Arc::new(StubBackend));
        let resp = svc.call(BackendRequest::VerifyConnection).await.unwrap();
        assert_eq!(resp.into_models(), Some(vec!["m1".to_string()]));
    }
}
