//! The resilient single-request executor (spec §4.2): wraps a `Backend`
//! call with, outer to inner, a retry loop, a circuit breaker, and a
//! per-attempt timeout, recording per-host call/failure/latency metrics on
//! every completed attempt.
//!
//! Built entirely from the sibling layer crates ([`llmcache_retry`],
//! [`llmcache_circuitbreaker`], [`llmcache_timelimiter`]) stacked with
//! [`tower::ServiceBuilder`], the same way the dependency stack's own
//! example binaries compose its layers.
//!
//! ```no_run
//! use llmcache_client::{ClientConfigBuilder, ResilientClient};
//! use llmcache_core::{Backend, Captured};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example(backend: Arc<dyn Backend>) {
//! let config = ClientConfigBuilder::new()
//!     .max_attempts(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .failure_threshold(5)
//!     .min_requests(10)
//!     .open_duration(Duration::from_secs(30))
//!     .build();
//!
//! let client = ResilientClient::new(backend, config);
//! let captured = Captured { command: "git push".into(), stdout: String::new(), stderr: "rejected".into(), exit_code: 1 };
//! let suggestion = client.get_suggestion(&captured, "en").await;
//! # }
//! ```

mod config;
mod error;
mod metrics;
mod request;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{AttemptError, ClientError, Result};
pub use metrics::{HostMetricsRegistry, HostMetricsSnapshot};
pub use request::{BackendRequest, BackendResponse, BackendService};

use futures::future::BoxFuture;
use llmcache_circuitbreaker::{CircuitBreaker, CircuitBreakerError, CircuitBreakerLayer};
use llmcache_core::{Backend, BackendError, Captured, EnhancedCaptured, Suggestion};
use llmcache_retry::RetryLayer;
use llmcache_timelimiter::{TimeLimiter, TimeLimiterError, TimeLimiterLayer};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};

/// Innermost wrapper around [`BackendService`]: records per-host metrics for
/// every completed attempt (spec: "recorded atomically on every completed
/// attempt"), before the per-attempt timeout, circuit breaker and retry
/// layers ever see the result.
#[derive(Clone)]
struct MetricsService {
    inner: BackendService,
    metrics: Arc<HostMetricsRegistry>,
}

impl Service<BackendRequest> for MetricsService {
    type Response = BackendResponse;
    type Error = BackendError;
    type Future = BoxFuture<'static, Result<BackendResponse>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: BackendRequest) -> Self::Future {
        let mut inner = self.inner.clone();
        let metrics = Arc::clone(&self.metrics);
        let host = self.inner.backend_id().to_string();
        Box::pin(async move {
            let start = Instant::now();
            let result = inner.call(req).await;
            metrics.record(&host, result.is_ok(), start.elapsed());
            result
        })
    }
}

type Stack =
    llmcache_retry::Retry<CircuitBreaker<TimeLimiter<MetricsService, BackendRequest>, BackendRequest, BackendResponse, TimeLimiterError<BackendError>>, BackendRequest, AttemptError>;

/// Resilient executor for a single [`Backend`]: retry(outer) →
/// circuit-breaker → per-attempt timeout(inner), with per-host metrics.
pub struct ResilientClient {
    backend_id: String,
    stack: tokio::sync::Mutex<Stack>,
    metrics: Arc<HostMetricsRegistry>,
}

impl ResilientClient {
    pub fn new(backend: Arc<dyn Backend>, config: ClientConfig) -> Self {
        let backend_id = backend.backend_id().to_string();
        let metrics = Arc::new(HostMetricsRegistry::new());

        let backend_service = BackendService::new(backend);
        let metrics_service = MetricsService {
            inner: backend_service,
            metrics: Arc::clone(&metrics),
        };

        let timelimiter_layer = TimeLimiterLayer::<BackendRequest>::builder()
            .timeout_duration(config.request_timeout)
            .name(config.name.clone())
            .build();
        let timelimited = timelimiter_layer.layer(metrics_service);

        // §4.2 opens on an *absolute* failure count (`failures >= failure_threshold`)
        // once at least `min_requests` calls have been made; the underlying breaker
        // only understands a failure *rate* over a sliding window. Size the window
        // to the larger of the two so it can never evaluate before either gate is
        // satisfied, and pick the rate that corresponds to exactly
        // `failure_threshold` failures in a full window, so a window-full of
        // failures (and nothing less) trips it.
        let failure_threshold = config.failure_threshold.max(1);
        let min_requests = config.min_requests.max(1);
        let window = failure_threshold.max(min_requests);
        let failure_rate = failure_threshold as f64 / window as f64;
        let breaker_layer = CircuitBreakerLayer::<BackendResponse, TimeLimiterError<BackendError>>::builder()
            .failure_rate_threshold(failure_rate)
            .sliding_window_size(window)
            .minimum_number_of_calls(window)
            .wait_duration_in_open(config.open_duration)
            .name(config.name.clone())
            .build();
        let breakered = breaker_layer.layer(timelimited);

        let retry_layer = RetryLayer::<BackendRequest, AttemptError>::builder()
            .max_attempts(config.max_attempts)
            .backoff(
                llmcache_retry::ExponentialRandomBackoff::new(config.initial_delay)
                    .max_interval(config.max_delay)
                    .jitter_fraction(config.jitter_ratio),
            )
            .retry_on(|err: &AttemptError| match err {
                CircuitBreakerError::OpenCircuit => false,
                CircuitBreakerError::Inner(TimeLimiterError::Timeout) => true,
                CircuitBreakerError::Inner(TimeLimiterError::Inner(backend_err)) => backend_err.retryable,
            })
            .name(config.name.clone())
            .build();
        let stack = retry_layer.layer(breakered);

        Self {
            backend_id,
            stack: tokio::sync::Mutex::new(stack),
            metrics,
        }
    }

    pub fn backend_id(&self) -> &str {
        &self.backend_id
    }

    /// Per-host call/failure/latency metrics accumulated across every
    /// attempt this client has executed.
    pub fn metrics(&self) -> HostMetricsSnapshot {
        self.metrics.snapshot(&self.backend_id)
    }

    async fn execute(&self, req: BackendRequest) -> Result<BackendResponse> {
        let mut stack = self.stack.lock().await;
        stack
            .call(req)
            .await
            .map_err(|err| ClientError::from_attempt(&self.backend_id, err))
    }

    pub async fn get_suggestion(&self, captured: &Captured, language: &str) -> Result<Suggestion> {
        let response = self
            .execute(BackendRequest::Suggestion {
                captured: captured.clone(),
                language: language.to_string(),
            })
            .await?;
        Ok(response.into_suggestion().expect("Suggestion request yields Suggestion response"))
    }

    pub async fn get_enhanced_suggestion(
        &self,
        captured: &EnhancedCaptured,
        language: &str,
    ) -> Result<Suggestion> {
        let response = self
            .execute(BackendRequest::EnhancedSuggestion {
                captured: captured.clone(),
                language: language.to_string(),
            })
            .await?;
        Ok(response
            .into_suggestion()
            .expect("EnhancedSuggestion request yields Suggestion response"))
    }

    pub async fn generate_command(&self, prompt: &str, language: &str) -> Result<String> {
        let response = self
            .execute(BackendRequest::GenerateCommand {
                prompt: prompt.to_string(),
                language: language.to_string(),
            })
            .await?;
        Ok(response.into_command().expect("GenerateCommand request yields Command response"))
    }

    pub async fn verify_connection(&self) -> Result<Vec<String>> {
        let response = self.execute(BackendRequest::VerifyConnection).await?;
        Ok(response.into_models().expect("VerifyConnection request yields Models response"))
    }
}
