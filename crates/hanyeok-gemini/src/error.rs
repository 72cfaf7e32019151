//! Error types for hanyeok-gemini.

use hanyeok_core::ErrorKind;
use thiserror::Error;

/// Result type alias for hanyeok-gemini operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for Gemini client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed. Construct through [`Error::http`] so the URL is stripped.
    #[error("HTTP request to the Gemini API failed")]
    Reqwest(#[source] reqwest::Error),

    /// (De)serialization failed.
    #[error("Gemini payload could not be (de)serialized")]
    Serde(#[from] serde_json::Error),

    /// Endpoint could not be built.
    #[error("Gemini endpoint could not be built")]
    Url(#[from] url::ParseError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API answered with a non-success status.
    #[error("Gemini API returned {status}: {message}")]
    Status {
        status: u16,
        /// Most specific reason in the error body, e.g. "API_KEY_INVALID".
        reason: Option<String>,
        message: String,
    },

    /// The response carried no usable candidate text.
    #[error("Gemini response has no text: {0}")]
    EmptyResponse(String),
}

impl Error {
    /// Wraps a reqwest error, dropping the request URL.
    pub fn http(error: reqwest::Error) -> Self {
        Self::Reqwest(error.without_url())
    }

    /// Returns whether the API rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Status {
                status,
                reason,
                message,
            } => auth_failure(*status, reason.as_deref(), message),
            _ => false,
        }
    }
}

fn auth_failure(status: u16, reason: Option<&str>, message: &str) -> bool {
    matches!(status, 401 | 403)
        || matches!(reason, Some("API_KEY_INVALID" | "UNAUTHENTICATED" | "PERMISSION_DENIED"))
        || message.contains("API_KEY_INVALID")
}

impl From<Error> for hanyeok_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) if e.is_timeout() => hanyeok_core::Error::timeout().with_source(e),
            Error::Reqwest(e) => hanyeok_core::Error::new(ErrorKind::ServiceUnavailable)
                .with_message(if e.is_connect() {
                    "Connection to the model API failed"
                } else {
                    "Request to the model API failed"
                })
                .with_source(e),
            Error::Status {
                status,
                reason,
                message,
            } => {
                let error = if auth_failure(status, reason.as_deref(), &message) {
                    hanyeok_core::Error::upstream_auth(status)
                } else {
                    hanyeok_core::Error::upstream(status)
                };
                error.with_message(format!("Gemini API returned {status}: {message}"))
            }
            Error::Serde(e) => {
                hanyeok_core::Error::parse("Gemini payload is not valid JSON").with_source(e)
            }
            Error::EmptyResponse(reason) => hanyeok_core::Error::parse(reason),
            Error::Url(e) => {
                hanyeok_core::Error::configuration("Gemini endpoint is not a valid URL")
                    .with_source(e)
            }
            Error::Config(message) => hanyeok_core::Error::configuration(message),
        }
    }
}
