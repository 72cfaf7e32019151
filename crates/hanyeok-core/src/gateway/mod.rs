//! Language model gateway.
//!
//! - [`CompletionProvider`] is the seam concrete model clients implement
//! - [`CompletionService`] wraps a provider with a deadline and structured logging

mod request;
mod response;
mod service;

pub use self::request::{CompletionRequest, GenerationConfig, GenerationConfigBuilder};
pub use self::response::{CompletionResponse, TokenUsage};
pub use self::service::CompletionService;
use crate::Result;
use crate::health::ServiceHealth;

/// Provider trait for schema-constrained text completion.
///
/// Implementations send one request to a hosted model and return the raw
/// generated text. Failures are reported through [`crate::Error`] with the
/// kind matching the upstream condition.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generates a completion for the request.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Performs a health check on the provider.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
