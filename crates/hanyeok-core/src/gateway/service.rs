//! Completion service with a deadline and observability.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;

use super::{CompletionProvider, CompletionRequest, CompletionResponse};
use crate::health::ServiceHealth;
use crate::{Error, Result, TRACING_TARGET_GATEWAY};

/// Default deadline for a single completion.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Completion service wrapping any [`CompletionProvider`].
///
/// Every call is bounded by a deadline; expiry yields an
/// [`ErrorKind::Timeout`](crate::ErrorKind::Timeout) error.
#[derive(Clone)]
pub struct CompletionService {
    provider: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl fmt::Debug for CompletionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CompletionService {
    /// Creates a new service from a provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: CompletionProvider + 'static,
    {
        Self::from_provider(Arc::new(provider))
    }

    /// Creates a new service from a shared provider.
    pub fn from_provider(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the per-call deadline.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generates a completion within the configured deadline.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_GATEWAY,
            request_id = %request.request_id,
            prompt_length = request.prompt.len(),
            timeout_ms = self.timeout.as_millis(),
            "Processing completion request"
        );

        let result = match tokio::time::timeout(self.timeout, self.provider.complete(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(Error::timeout()),
        };
        let elapsed = Timestamp::now().duration_since(started_at);

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET_GATEWAY,
                    request_id = %request.request_id,
                    content_length = response.content_length(),
                    finish_reason = response.finish_reason.as_deref(),
                    elapsed_ms = elapsed.as_millis(),
                    "Completion successful"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_GATEWAY,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Completion failed"
                );
            }
        }

        result
    }

    /// Performs a health check on the underlying provider.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;
    use crate::gateway::GenerationConfig;
    use crate::mock::MockProvider;

    fn request() -> CompletionRequest {
        CompletionRequest {
            request_id: uuid::Uuid::now_v7(),
            prompt: "prompt".into(),
            schema: json!({ "type": "OBJECT" }),
            generation: GenerationConfig::default(),
        }
    }

    #[tokio::test]
    async fn returns_provider_text() {
        let provider = MockProvider::new("{\"ok\":true}");
        let service = CompletionService::new(provider.clone());

        let response = service.complete(&request()).await.unwrap();
        assert_eq!(response.text, "{\"ok\":true}");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expires_slow_provider() {
        let provider = MockProvider::new("{}").with_delay(Duration::from_secs(5));
        let service = CompletionService::new(provider).with_timeout(Duration::from_secs(1));

        let error = service.complete(&request()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn propagates_provider_errors() {
        let provider = MockProvider::failing(ErrorKind::RateLimited);
        let service = CompletionService::new(provider);

        let error = service.complete(&request()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::RateLimited);
    }
}
