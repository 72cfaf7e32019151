//! Raw JSON body extractor.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use derive_more::{Deref, From};
use hanyeok_core::{Classification, ErrorKind};
use serde_json::Value;

use crate::handler::Error;

/// Tracing target for body extraction.
const TRACING_TARGET: &str = "hanyeok_server::extract::body";

/// Request body parsed as an untyped JSON value.
///
/// Field-level validation is left to the translation pipeline so that its
/// messages name the offending field. An empty body is [`Value::Null`];
/// malformed JSON and oversized bodies are rejected as validation errors.
#[must_use]
#[derive(Debug, Clone, Default, Deref, From)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(reject_bytes)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Null));
        }

        serde_json::from_slice(&bytes).map(Self).map_err(|err| {
            tracing::debug!(
                target: TRACING_TARGET,
                line = err.line(),
                column = err.column(),
                "Malformed JSON body"
            );
            validation("Request body must be valid JSON")
        })
    }
}

fn reject_bytes(rejection: BytesRejection) -> Error {
    tracing::debug!(
        target: TRACING_TARGET,
        status = rejection.status().as_u16(),
        rejection = %rejection.body_text(),
        "Request body rejected"
    );

    if rejection.status().as_u16() == 413 {
        validation("Request body is too large")
    } else {
        validation("Request body could not be read")
    }
}

fn validation(message: &'static str) -> Error {
    let mut classification = Classification::from_kind(ErrorKind::Validation);
    classification.message = message.into();
    Error::from(classification)
}
