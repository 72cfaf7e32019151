//! End-to-end translation of one request body.

use std::fmt;

use jiff::Timestamp;
use serde_json::Value;

use crate::gateway::{CompletionRequest, CompletionService, GenerationConfig};
use crate::health::ServiceHealth;
use crate::prompt::{Persona, PromptComposer};
use crate::request::{LanguagePolicy, RequestValidator};
use crate::response::{ResponseValidator, TranslationResult};
use crate::sanitize::Sanitizer;
use crate::{Result, TRACING_TARGET_PIPELINE};

/// Runs the translation stages in a fixed order.
///
/// 1. validate the raw body into a [`TranslationRequest`](crate::request::TranslationRequest)
/// 2. sanitize the text and the custom instruction
/// 3. compose the prompt and output schema
/// 4. call the model through the [`CompletionService`]
/// 5. validate the model output into a [`TranslationResult`]
///
/// Any failing stage stops the pipeline; the model is never called for a
/// request rejected by stages 1 or 2.
#[derive(Clone)]
pub struct Translator {
    validator: RequestValidator,
    sanitizer: Sanitizer,
    composer: PromptComposer,
    completion: CompletionService,
    generation: GenerationConfig,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("validator", &self.validator)
            .field("composer", &self.composer)
            .field("completion", &self.completion)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// Creates a translator with the closed language policy and no persona.
    pub fn new(completion: CompletionService) -> Result<Self> {
        Ok(Self {
            validator: RequestValidator::default(),
            sanitizer: Sanitizer::new()?,
            composer: PromptComposer::new(),
            completion,
            generation: GenerationConfig::default(),
        })
    }

    /// Sets the target language policy.
    pub fn with_language_policy(mut self, policy: LanguagePolicy) -> Self {
        self.validator = RequestValidator::new(policy);
        self
    }

    /// Sets the persona prepended to every prompt.
    pub fn with_persona(mut self, persona: Option<Persona>) -> Self {
        self.composer = self.composer.with_persona(persona);
        self
    }

    /// Sets the generation controls.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Returns the target language policy.
    #[inline]
    pub fn language_policy(&self) -> LanguagePolicy {
        self.validator.policy()
    }

    /// Translates a raw request body.
    pub async fn translate(&self, body: &Value) -> Result<TranslationResult> {
        let started_at = Timestamp::now();

        let request = self.validator.validate(body)?;
        let text = self.sanitizer.sanitize(request.text())?;
        let custom_prompt = request
            .custom_prompt()
            .map(|prompt| self.sanitizer.sanitize(prompt))
            .transpose()?;

        let prompt = self
            .composer
            .compose(&request, &text, custom_prompt.as_ref());
        let completion = CompletionRequest::new(&prompt, self.generation.clone());

        tracing::info!(
            target: TRACING_TARGET_PIPELINE,
            request_id = %completion.request_id,
            text_chars = request.text().chars().count(),
            targets = request.targets().len(),
            custom_prompt = custom_prompt.is_some(),
            translation_style = ?request.translation_style(),
            "Translating request"
        );

        let response = self.completion.complete(&completion).await?;
        let result = ResponseValidator::new(request.targets(), request.source_lines())
            .validate(&response.text)?;

        let elapsed = Timestamp::now().duration_since(started_at);
        tracing::info!(
            target: TRACING_TARGET_PIPELINE,
            request_id = %completion.request_id,
            detected_language = %result.detected_language,
            lines = result.korean.len(),
            elapsed_ms = elapsed.as_millis(),
            "Translation completed"
        );

        Ok(result)
    }

    /// Performs a health check on the model provider.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.completion.health_check().await
    }
}
