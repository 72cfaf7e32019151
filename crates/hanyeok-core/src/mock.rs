//! In-memory completion provider for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::gateway::{CompletionProvider, CompletionRequest, CompletionResponse};
use crate::health::ServiceHealth;
use crate::{Error, ErrorKind, Result};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(ErrorKind),
}

/// Provider returning a canned reply and recording what it received.
#[derive(Debug, Clone)]
pub struct MockProvider {
    reply: Reply,
    delay: Option<Duration>,
    healthy: bool,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<CompletionRequest>>>,
}

impl MockProvider {
    /// Creates a provider that always answers with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    /// Creates a provider that always answers with `value` serialized to JSON.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(value.to_string())
    }

    /// Creates a provider that always fails with `kind`.
    pub fn failing(kind: ErrorKind) -> Self {
        Self::with_reply(Reply::Fail(kind))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            delay: None,
            healthy: true,
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Delays every completion by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reports the provider as unhealthy.
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Returns how many completions were requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the prompt of the most recent completion.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_request
            .lock()
            .ok()
            .and_then(|request| request.as_ref().map(|request| request.prompt.clone()))
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Text(text) => Ok(CompletionResponse::new(text.clone())
                .with_finish_reason("STOP")),
            Reply::Fail(kind) => Err(Error::new(*kind)),
        }
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        if self.healthy {
            Ok(ServiceHealth::healthy())
        } else {
            Ok(ServiceHealth::unhealthy("mock provider is unavailable"))
        }
    }
}
