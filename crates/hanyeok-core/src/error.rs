//! Error taxonomy shared by every stage of the translation pipeline.
//!
//! Each failure carries exactly one [`ErrorKind`], and every kind maps to a
//! stable machine-readable code, an HTTP-style status and a generic
//! user-facing message. The mapping lives here so that the server layer and
//! the pipeline cannot disagree about it.

use std::borrow::Cow;
use std::error::Error as StdError;

use strum::{AsRefStr, Display, IntoStaticStr};

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for pipeline operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of failures the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A request field is missing, malformed or out of bounds.
    Validation,
    /// The text contains a dangerous markup or script pattern.
    InvalidInput,
    /// No route matches the requested path.
    NotFound,
    /// The route exists but not for the requested method.
    MethodNotAllowed,
    /// The model call exceeded its deadline.
    Timeout,
    /// The model API rejected the call because of rate limits.
    RateLimited,
    /// The model API rejected the configured credential.
    UpstreamAuth,
    /// The model API returned any other non-success status or was unreachable.
    ServiceUnavailable,
    /// The model output could not be parsed.
    Parse,
    /// The model output lacked a required field or line.
    IncompleteResult,
    /// The service itself is misconfigured.
    Configuration,
    /// Anything unclassified.
    Internal,
}

impl ErrorKind {
    /// Returns the stable code sent to clients.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Timeout => "TIMEOUT",
            Self::RateLimited => "RATE_LIMITED",
            Self::UpstreamAuth => "UPSTREAM_AUTH",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Parse => "PARSE_ERROR",
            Self::IncompleteResult => "INCOMPLETE_RESULT",
            Self::Configuration => "CONFIG_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns the suggested HTTP status code.
    #[must_use]
    pub const fn status(self) -> u16 {
        match self {
            Self::Validation | Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Timeout => 408,
            Self::RateLimited => 429,
            Self::ServiceUnavailable => 503,
            Self::UpstreamAuth
            | Self::Parse
            | Self::IncompleteResult
            | Self::Configuration
            | Self::Internal => 500,
        }
    }

    /// Returns the generic message shown to clients for this kind.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Validation => "The request is invalid",
            Self::InvalidInput => "The input contains content that is not allowed",
            Self::NotFound => "The requested resource was not found",
            Self::MethodNotAllowed => "This method is not allowed for the requested resource",
            Self::Timeout => {
                "The translation took too long. Please try again with a shorter text"
            }
            Self::RateLimited => "Too many translation requests. Please try again later",
            Self::UpstreamAuth => "The translation service is not configured correctly",
            Self::ServiceUnavailable => {
                "The translation service is temporarily unavailable. Please try again later"
            }
            Self::Parse | Self::IncompleteResult | Self::Internal => {
                "An error occurred during translation. Please try again later"
            }
            Self::Configuration => "The translation service is not configured correctly",
        }
    }

    /// Returns whether the request message may be shown to the client as is.
    ///
    /// Only validation messages are built from request field names; every
    /// other kind answers with its generic [`user_message`](Self::user_message).
    #[must_use]
    pub const fn exposes_message(self) -> bool {
        matches!(self, Self::Validation)
    }

    /// Returns whether this kind was caused by the service or its upstream.
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.status() >= 500
    }
}

/// Pipeline error with structured information.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    upstream_status: Option<u16>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates a new [`Error`] with the kind's generic message.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: Cow::Borrowed(kind.user_message()),
            upstream_status: None,
            source: None,
        }
    }

    /// Creates a validation error naming the offending field.
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Validation).with_message(message)
    }

    /// Creates a sanitization rejection.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates an error for a non-success status returned by the model API.
    ///
    /// The status decides the kind: 429 is rate limiting, 401 and 403 are
    /// credential failures and everything else is reported as unavailable.
    pub fn upstream(status: u16) -> Self {
        let kind = match status {
            429 => ErrorKind::RateLimited,
            401 | 403 => ErrorKind::UpstreamAuth,
            _ => ErrorKind::ServiceUnavailable,
        };

        Self {
            upstream_status: Some(status),
            ..Self::new(kind)
        }
    }

    /// Creates a credential failure reported by the model API.
    ///
    /// Used when the body, not the status, identifies the failure, such as a
    /// 400 carrying `API_KEY_INVALID`.
    pub fn upstream_auth(status: u16) -> Self {
        Self {
            upstream_status: Some(status),
            ..Self::new(ErrorKind::UpstreamAuth)
        }
    }

    /// Creates a parse error for malformed model output.
    pub fn parse(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Parse).with_message(message)
    }

    /// Creates an error for model output missing required data.
    pub fn incomplete(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::IncompleteResult).with_message(message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration).with_message(message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal).with_message(message)
    }

    /// Replaces the message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches a source error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the status returned by the model API, if any.
    #[inline]
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        self.upstream_status
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
