//! Gemini client implementation using reqwest.

use std::sync::Arc;
use std::time::Instant;

use hanyeok_core::ServiceHealth;
use hanyeok_core::gateway::{
    CompletionProvider, CompletionRequest, CompletionResponse, CompletionService,
    GenerationConfig,
};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use url::Url;

use crate::TRACING_TARGET_CLIENT;
use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::wire::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Upper bound on error body characters kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 1024;

/// Inner client that holds the HTTP client and configuration.
struct GeminiClientInner {
    http: Client,
    config: GeminiConfig,
    generate_content_url: Url,
    model_metadata_url: Url,
}

impl std::fmt::Debug for GeminiClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClientInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Implements [`CompletionProvider`]: every call sends one request and
/// returns the first candidate's text. Retries are left to the caller.
///
/// # Examples
///
/// ```rust,ignore
/// use hanyeok_gemini::{GeminiClient, GeminiConfig};
///
/// let client = GeminiClient::new(GeminiConfig::new(api_key))?;
/// let service = client.into_service();
/// ```
#[derive(Clone, Debug)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

impl GeminiClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model = %config.model,
            timeout_ms = config.timeout().as_millis(),
            "Creating Gemini client"
        );

        config.validate()?;

        let mut api_key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|_| Error::Config("GEMINI_API_KEY contains invalid characters".into()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("hanyeok/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(Error::http)?;

        let inner = GeminiClientInner {
            http,
            generate_content_url: config.generate_content_url()?,
            model_metadata_url: config.model_metadata_url()?,
            config,
        };

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            model = %inner.config.model,
            "Gemini client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.inner.config
    }

    /// Returns the generation controls derived from the configuration.
    pub fn generation(&self) -> Result<GenerationConfig> {
        self.inner.config.generation()
    }

    /// Converts this client into a [`CompletionService`] bounded by the configured timeout.
    pub fn into_service(self) -> CompletionService {
        let timeout = self.inner.config.timeout();
        CompletionService::new(self).with_timeout(timeout)
    }

    async fn generate_content(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = GenerateContentRequest::from(request);
        let response = self
            .inner
            .http
            .post(self.inner.generate_content_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(Error::http)?;

        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await.map_err(Error::http)?;
        let mut payload: GenerateContentResponse = serde_json::from_slice(&bytes)?;

        if let Some(reason) = payload.block_reason() {
            return Err(Error::EmptyResponse(format!("prompt was blocked: {reason}")));
        }

        let finish_reason = payload.finish_reason().map(str::to_owned);
        let text = payload.first_text().ok_or_else(|| {
            Error::EmptyResponse(match &finish_reason {
                Some(reason) => format!("candidate finished with {reason}"),
                None => "no candidates".to_owned(),
            })
        })?;

        let mut completion = CompletionResponse::new(text);
        if let Some(reason) = finish_reason {
            completion = completion.with_finish_reason(reason);
        }
        if let Some(usage) = payload.usage_metadata.take() {
            completion = completion.with_usage(usage.into());
        }

        Ok(completion)
    }

    /// Converts a non-success response into [`Error::Status`].
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let api_error = serde_json::from_str::<ErrorResponse>(&body)
            .map(|body| body.error)
            .unwrap_or_default();

        let message = if api_error.message.is_empty() {
            body.chars().take(ERROR_BODY_LIMIT).collect()
        } else {
            api_error.message.clone()
        };

        Err(Error::Status {
            status: status.as_u16(),
            reason: api_error.reason(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> hanyeok_core::Result<CompletionResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request.request_id,
            model = %self.inner.config.model,
            "Sending generateContent request"
        );

        let result = self.generate_content(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    request_id = %request.request_id,
                    finish_reason = response.finish_reason.as_deref(),
                    total_tokens = response.usage.map(|usage| usage.total_tokens),
                    elapsed_ms = elapsed.as_millis(),
                    "generateContent completed"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_CLIENT,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "generateContent failed"
                );
            }
        }

        result.map_err(Into::into)
    }

    async fn health_check(&self) -> hanyeok_core::Result<ServiceHealth> {
        let started_at = Instant::now();
        let result = self
            .inner
            .http
            .get(self.inner.model_metadata_url.clone())
            .send()
            .await
            .map_err(Error::http);
        let elapsed = started_at.elapsed();

        let health = match result {
            Ok(response) => match Self::check_status(response).await {
                Ok(_) => ServiceHealth::healthy(),
                Err(error) if error.is_auth_failure() => {
                    ServiceHealth::unhealthy("Gemini API rejected the credentials")
                }
                Err(Error::Status { status: 429, .. }) => {
                    ServiceHealth::degraded("Gemini API is rate limiting requests")
                }
                Err(error) => ServiceHealth::unhealthy(error.to_string()),
            },
            Err(error) => ServiceHealth::unhealthy(error.to_string()),
        };

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            status = ?health.status,
            elapsed_ms = elapsed.as_millis(),
            "Gemini health check completed"
        );

        Ok(health.with_response_time(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::extract::Path;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use hanyeok_core::{ErrorKind, ServiceStatus};
    use serde_json::{Value, json};

    use super::*;

    const KEY: &str = "test-key";

    async fn spawn(router: Router) -> anyhow::Result<String> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(format!("http://{addr}/v1beta"))
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            request_id: uuid::Uuid::now_v7(),
            prompt: "Translate".into(),
            schema: json!({ "type": "OBJECT" }),
            generation: GenerationConfig::default(),
        }
    }

    fn client(base_url: String) -> anyhow::Result<GeminiClient> {
        Ok(GeminiClient::new(GeminiConfig::new(KEY).with_base_url(base_url))?)
    }

    async fn generate(
        Path(model): Path<String>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) != Some(KEY) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": {
                        "code": 400,
                        "message": "API key not valid. Please pass a valid API key.",
                        "status": "INVALID_ARGUMENT",
                        "details": [{ "reason": "API_KEY_INVALID" }]
                    }
                })),
            );
        }

        let text = json!({
            "model": model,
            "prompt": body["contents"][0]["parts"][0]["text"],
            "schemaType": body["generationConfig"]["responseSchema"]["type"],
        });

        (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": text.to_string() }], "role": "model" },
                    "finishReason": "STOP"
                }],
                "usageMetadata": { "promptTokenCount": 3, "candidatesTokenCount": 5, "totalTokenCount": 8 }
            })),
        )
    }

    #[tokio::test]
    async fn sends_prompt_and_reads_candidate() -> anyhow::Result<()> {
        let router = Router::new().route("/v1beta/models/{call}", post(generate));
        let client = client(spawn(router).await?)?;

        let response = client.complete(&request()).await?;
        let echoed: Value = serde_json::from_str(&response.text)?;

        assert_eq!(echoed["model"], "gemini-2.5-flash:generateContent");
        assert_eq!(echoed["prompt"], "Translate");
        assert_eq!(echoed["schemaType"], "OBJECT");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.map(|usage| usage.total_tokens), Some(8));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_key_is_auth_error() -> anyhow::Result<()> {
        let router = Router::new().route("/v1beta/models/{call}", post(generate));
        let client = GeminiClient::new(
            GeminiConfig::new("wrong-key").with_base_url(spawn(router).await?),
        )?;

        let error = client.complete(&request()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UpstreamAuth);
        assert!(!error.to_string().contains("wrong-key"));
        Ok(())
    }

    #[tokio::test]
    async fn maps_rate_limit_status() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } })),
                )
            }),
        );
        let client = client(spawn(router).await?)?;

        let error = client.complete(&request()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::RateLimited);
        assert_eq!(error.upstream_status(), Some(429));
        Ok(())
    }

    #[tokio::test]
    async fn empty_candidates_is_parse_error() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { Json(json!({ "candidates": [] })) }),
        );
        let client = client(spawn(router).await?)?;

        let error = client.complete(&request()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse);
        Ok(())
    }

    #[tokio::test]
    async fn slow_upstream_times_out() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let client = GeminiClient::new(
            GeminiConfig::new(KEY)
                .with_base_url(spawn(router).await?)
                .with_timeout(Duration::from_secs(1)),
        )?;

        let error = client.complete(&request()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Timeout);
        Ok(())
    }

    #[tokio::test]
    async fn health_check_reports_status() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/v1beta/models/{model}",
            get(|| async { Json(json!({ "name": "models/gemini-2.5-flash" })) }),
        );
        let client = client(spawn(router).await?)?;

        let health = client.health_check().await?;
        assert_eq!(health.status, ServiceStatus::Healthy);
        Ok(())
    }

    #[test]
    fn rejects_blank_key() {
        assert!(GeminiClient::new(GeminiConfig::new("")).is_err());
    }
}
