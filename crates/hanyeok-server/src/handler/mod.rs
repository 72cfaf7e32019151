//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use hanyeok_core::gateway::{CompletionService, GenerationConfig};
//! use hanyeok_server::handler::routes;
//! use hanyeok_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example(completion: CompletionService) -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config, completion, GenerationConfig::default())?;
//! let router = routes(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod response;
mod translate;

use axum::Router;
use axum::routing::any;
use hanyeok_core::ErrorKind;
use tower_http::services::{ServeDir, ServeFile};

pub use crate::handler::error::{Error, Result};
pub use crate::handler::response::{ErrorResponse, HealthResponse, TranslateResponse};
use crate::service::ServiceState;

/// Tracing target for route assembly.
const TRACING_TARGET: &str = "hanyeok_server::handler";

#[inline]
async fn not_found() -> Error {
    Error::new(ErrorKind::NotFound)
}

/// Returns a [`Router`] with all routes and the given state applied.
///
/// Unknown `/api/*` paths always answer with a JSON 404. Other unknown
/// paths are served from the static directory when one is configured,
/// falling back to its `index.html`.
pub fn routes(state: ServiceState) -> Router {
    let router = Router::new()
        .merge(translate::routes())
        .merge(monitors::routes())
        .route("/api/{*rest}", any(not_found));

    let router = match state.static_dir() {
        Some(static_dir) => {
            tracing::info!(
                target: TRACING_TARGET,
                static_dir = %static_dir.display(),
                "Serving static assets"
            );

            let index = ServeFile::new(static_dir.join("index.html"));
            router.fallback_service(ServeDir::new(static_dir).fallback(index))
        }
        None => router.fallback(not_found),
    };

    router.with_state(state)
}
