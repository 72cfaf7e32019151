#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use hanyeok_core::gateway::CompletionService;
use hanyeok_server::handler::routes;
use hanyeok_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt, SecurityHeadersConfig,
};
use hanyeok_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig, create_completion};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "hanyeok_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "hanyeok_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "hanyeok_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    cli.telemetry.init_tracing();
    cli.log();
    cli.validate()?;

    let (completion, generation) =
        create_completion(&cli.gemini).context("failed to create the model client")?;
    let state = create_service_state(&cli, completion, generation)?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
fn create_service_state(
    cli: &Cli,
    completion: CompletionService,
    generation: hanyeok_core::gateway::GenerationConfig,
) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(&cli.service, completion, generation)
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost): catches panics and enforces timeouts
/// 2. Observability: request IDs and tracing spans
/// 3. Security: CORS, security headers, compression, body limit
/// 4. Routes (innermost)
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes(state)
        .with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_observability()
        .with_recovery(&middleware.recovery)
}
