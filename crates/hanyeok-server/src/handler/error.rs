//! HTTP error type rendering the `{error, code}` envelope.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hanyeok_core::{Classification, ErrorKind};

use crate::handler::response::ErrorResponse;

/// Tracing target for error responses.
const TRACING_TARGET: &str = "hanyeok_server::handler::error";

/// The error type for HTTP handlers in the server.
///
/// Wraps an already classified failure: the client message, stable code
/// and status are fixed by the time the error exists.
#[derive(Clone, PartialEq, Eq)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error {
    classification: Classification,
}

impl Error {
    /// Creates a new [`Error`] with the generic message of the kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            classification: Classification::from_kind(kind),
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.classification.kind
    }

    /// Returns the classification.
    #[inline]
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Returns the HTTP status.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.classification.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<Classification> for Error {
    #[inline]
    fn from(classification: Classification) -> Self {
        Self { classification }
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.classification.kind)
            .field("code", &self.classification.code)
            .field("status", &self.classification.status)
            .field("message", &self.classification.message)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.classification.code, self.classification.status, self.classification.message
        )
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        tracing::debug!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            code = self.classification.code,
            "HTTP error response"
        );

        let body = ErrorResponse {
            error: self.classification.message,
            code: self.classification.code,
            details: self.classification.detail,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// A specialized [`Result`] type for HTTP handlers.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_kind() {
        assert_eq!(Error::new(ErrorKind::Timeout).status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            Error::new(ErrorKind::MethodNotAllowed).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            Error::new(ErrorKind::UpstreamAuth).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_contains_code() {
        let error = Error::new(ErrorKind::RateLimited);
        assert!(error.to_string().starts_with("RATE_LIMITED (429)"));
    }
}
