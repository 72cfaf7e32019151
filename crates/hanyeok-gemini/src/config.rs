//! Gemini client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use hanyeok_core::gateway::GenerationConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default values for configuration options.
pub mod defaults {
    /// Default model.
    pub const MODEL: &str = "gemini-2.5-flash";

    /// Default API base URL.
    pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default request timeout in seconds.
    pub const TIMEOUT_SECS: u64 = 30;

    /// Default sampling temperature.
    pub const TEMPERATURE: f32 = 0.2;

    /// Default output token bound.
    pub const MAX_OUTPUT_TOKENS: u32 = 8192;
}

/// Configuration for the Gemini client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Model name, e.g. "gemini-2.5-flash".
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = defaults::MODEL)
    )]
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL, without a trailing slash.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = defaults::BASE_URL)
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-timeout", env = "GEMINI_TIMEOUT", default_value_t = defaults::TIMEOUT_SECS)
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature, 0.0 to 2.0.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-temperature", env = "GEMINI_TEMPERATURE", default_value_t = defaults::TEMPERATURE)
    )]
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-max-output-tokens", env = "GEMINI_MAX_OUTPUT_TOKENS", default_value_t = defaults::MAX_OUTPUT_TOKENS)
    )]
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_model() -> String {
    defaults::MODEL.to_owned()
}

fn default_base_url() -> String {
    defaults::BASE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT_SECS
}

fn default_temperature() -> f32 {
    defaults::TEMPERATURE
}

fn default_max_output_tokens() -> u32 {
    defaults::MAX_OUTPUT_TOKENS
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl GeminiConfig {
    /// Creates a configuration with default settings for the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: defaults::TIMEOUT_SECS,
            temperature: defaults::TEMPERATURE,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the generation controls sent with every request.
    pub fn generation(&self) -> Result<GenerationConfig> {
        GenerationConfig::builder()
            .with_temperature(self.temperature)
            .with_max_output_tokens(self.max_output_tokens)
            .build()
            .map_err(|err| Error::Config(err.to_string()))
    }

    /// Returns the `generateContent` endpoint for the configured model.
    pub fn generate_content_url(&self) -> Result<Url> {
        self.model_url(":generateContent")
    }

    /// Returns the metadata endpoint for the configured model.
    pub fn model_metadata_url(&self) -> Result<Url> {
        self.model_url("")
    }

    fn model_url(&self, suffix: &str) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{base}/models/{}{suffix}", self.model.trim());
        Ok(Url::parse(&url)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("GEMINI_API_KEY must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Config("GEMINI_MODEL must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("GEMINI_TIMEOUT must be greater than zero".into()));
        }

        self.generate_content_url()?;
        self.generation()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builds_endpoint() {
        let config = GeminiConfig::new("key").with_base_url("http://localhost:8080/v1beta/");
        assert_eq!(
            config.generate_content_url().unwrap().as_str(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            config.model_metadata_url().unwrap().as_str(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash"
        );
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(GeminiConfig::new("  ").validate().is_err());
        assert!(GeminiConfig::new("key").with_base_url("not a url").validate().is_err());

        let mut config = GeminiConfig::new("key");
        config.temperature = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = GeminiConfig::new("super-secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
