use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::prompt::ComposedPrompt;

/// Default values for generation controls.
mod defaults {
    /// Near-deterministic sampling.
    pub const TEMPERATURE: f32 = 0.2;

    /// Enough for 5000 characters of source text on every axis.
    pub const MAX_OUTPUT_TOKENS: u32 = 8192;

    /// Structured output is always JSON.
    pub const RESPONSE_MIME_TYPE: &str = "application/json";

    /// Upper bound accepted for `max_output_tokens`.
    pub const MAX_OUTPUT_TOKENS_LIMIT: u32 = 65_536;
}

/// Sampling and output controls sent with every completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(
    name = "GenerationConfigBuilder",
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature, 0.0 to 2.0.
    #[builder(default = "defaults::TEMPERATURE")]
    pub temperature: f32,

    /// Upper bound on generated tokens.
    #[builder(default = "defaults::MAX_OUTPUT_TOKENS")]
    pub max_output_tokens: u32,

    /// MIME type the response is forced to.
    #[builder(default = "defaults::RESPONSE_MIME_TYPE.to_owned()")]
    pub response_mime_type: String,
}

impl GenerationConfigBuilder {
    fn validate_config(&self) -> Result<(), String> {
        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {temperature}"
            ));
        }

        if let Some(max_output_tokens) = self.max_output_tokens
            && (max_output_tokens == 0 || max_output_tokens > defaults::MAX_OUTPUT_TOKENS_LIMIT)
        {
            return Err(format!(
                "Max output tokens must be between 1 and {}, got {max_output_tokens}",
                defaults::MAX_OUTPUT_TOKENS_LIMIT
            ));
        }

        Ok(())
    }
}

impl GenerationConfig {
    /// Creates a new builder.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: defaults::TEMPERATURE,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
            response_mime_type: defaults::RESPONSE_MIME_TYPE.to_owned(),
        }
    }
}

/// A single schema-constrained completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Identifier used to correlate logs across layers.
    pub request_id: Uuid,
    /// Instruction text.
    pub prompt: String,
    /// Structured-output schema.
    pub schema: Value,
    /// Sampling and output controls.
    pub generation: GenerationConfig,
}

impl CompletionRequest {
    /// Creates a request from a composed prompt.
    pub fn new(prompt: &ComposedPrompt, generation: GenerationConfig) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            prompt: prompt.text().to_owned(),
            schema: prompt.schema().clone(),
            generation,
        }
    }
}
