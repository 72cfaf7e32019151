//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # CORS, request timeout
//! ├── service: ServiceConfig        # Environment, languages, persona, static files
//! ├── gemini: GeminiConfig          # Model API credential and generation settings
//! └── telemetry: TelemetryConfig    # Log format
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! GEMINI_API_KEY="..." PORT=8080 hanyeok
//! ```

mod middleware;
mod provider;
mod server;
mod telemetry;

use std::process;

use anyhow::{Context, anyhow};
use clap::Parser;
use hanyeok_gemini::GeminiConfig;
use hanyeok_server::service::ServiceConfig;

pub use crate::config::middleware::MiddlewareConfig;
pub use crate::config::provider::create_completion;
pub use crate::config::server::ServerConfig;
pub use crate::config::telemetry::TelemetryConfig;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "hanyeok")]
#[command(about = "Korean-centred translation server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Translation service configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Gemini model configuration.
    #[clap(flatten)]
    pub gemini: GeminiConfig,

    /// Logging configuration.
    #[clap(flatten)]
    pub telemetry: TelemetryConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so that its
    /// values act as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    ///
    /// A missing API key, an unusable service or CORS configuration, or a
    /// request timeout that does not exceed the model timeout abort startup.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;

        self.gemini
            .validate()
            .context("invalid Gemini configuration")?;

        self.service
            .validate()
            .context("invalid service configuration")?;

        self.middleware
            .cors
            .validate()
            .context("invalid CORS configuration")?;

        self.service
            .persona()
            .context("invalid persona configuration")?;

        let request_timeout = self.middleware.recovery.request_timeout();
        let model_timeout = self.gemini.timeout();
        if request_timeout <= model_timeout {
            return Err(anyhow!(
                "Request timeout ({}s) must exceed the Gemini timeout ({}s)",
                request_timeout.as_secs(),
                model_timeout.as_secs()
            ));
        }

        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            environment = %self.service.environment,
            open_target_languages = self.service.open_target_languages,
            persona = ?self.service.persona,
            static_dir = ?self.service.static_dir,
            "Service configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            model = %self.gemini.model,
            base_url = %self.gemini.base_url,
            timeout_secs = self.gemini.timeout_secs,
            temperature = self.gemini.temperature,
            max_output_tokens = self.gemini.max_output_tokens,
            "Gemini configuration"
        );
    }

    fn log_build_info() {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            "starting hanyeok server"
        );

        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
