//! Health monitoring handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{Router, get};
use hanyeok_core::{ServiceHealth, Translator};

use crate::handler::response::HealthResponse;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "hanyeok_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status(
    State(translator): State<Translator>,
) -> (StatusCode, axum::Json<HealthResponse>) {
    let health = match translator.health_check().await {
        Ok(health) => health,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                kind = %error.kind(),
                "Health check failed"
            );
            ServiceHealth::unhealthy(error.kind().user_message())
        }
    };

    let status_code = if health.status.is_operational() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status = ?health.status,
        status_code = status_code.as_u16(),
        "Health status response prepared"
    );

    (status_code, axum::Json(HealthResponse::from(health)))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use hanyeok_core::ServiceStatus;
    use hanyeok_core::mock::MockProvider;

    use crate::handler::response::HealthResponse;
    use crate::handler::test::create_test_server_with_provider;

    #[tokio::test]
    async fn healthy_provider_returns_ok() -> anyhow::Result<()> {
        let server = create_test_server_with_provider(MockProvider::new("{}"))?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let health = response.json::<HealthResponse>();
        assert_eq!(health.status, ServiceStatus::Healthy);
        assert!(health.message.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn unhealthy_provider_returns_unavailable() -> anyhow::Result<()> {
        let server = create_test_server_with_provider(MockProvider::new("{}").unhealthy())?;

        let response = server.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let health = response.json::<HealthResponse>();
        assert_eq!(health.status, ServiceStatus::Unhealthy);

        Ok(())
    }
}
