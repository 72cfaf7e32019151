//! Translation handler.

use axum::extract::State;
use axum::routing::{Router, post};
use hanyeok_core::{ErrorClassifier, ErrorKind, Translator};

use crate::extract::JsonBody;
use crate::handler::response::TranslateResponse;
use crate::handler::{Error, Result};
use crate::service::ServiceState;

/// Tracing target for translation operations.
const TRACING_TARGET: &str = "hanyeok_server::handler::translate";

/// Translates the text of the request body.
#[tracing::instrument(skip_all)]
async fn translate(
    State(translator): State<Translator>,
    State(classifier): State<ErrorClassifier>,
    JsonBody(body): JsonBody,
) -> Result<axum::Json<TranslateResponse>> {
    tracing::debug!(target: TRACING_TARGET, "Translation requested");

    match translator.translate(&body).await {
        Ok(result) => Ok(axum::Json(TranslateResponse::new(result))),
        Err(error) => Err(Error::from(classifier.classify(&error))),
    }
}

async fn method_not_allowed() -> Error {
    Error::new(ErrorKind::MethodNotAllowed)
}

/// Returns a [`Router`] with the translation route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route(
        "/api/translate",
        post(translate).fallback(method_not_allowed),
    )
}
