//! Model provider construction.

use anyhow::Context;
use hanyeok_core::gateway::{CompletionService, GenerationConfig};
use hanyeok_gemini::{GeminiClient, GeminiConfig};

use crate::TRACING_TARGET_CONFIG;

/// Creates the timeout-bounded completion service and its generation settings.
pub fn create_completion(
    config: &GeminiConfig,
) -> anyhow::Result<(CompletionService, GenerationConfig)> {
    let generation = config
        .generation()
        .context("invalid generation settings")?;
    let client = GeminiClient::new(config.clone()).context("failed to build the Gemini client")?;

    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        model = %config.model,
        timeout_secs = config.timeout_secs,
        "Gemini client created"
    );

    Ok((client.into_service(), generation))
}
