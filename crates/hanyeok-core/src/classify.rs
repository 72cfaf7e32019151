//! Conversion of any failure into a client-facing classification.

use std::borrow::Cow;
use std::error::Error as StdError;

#[cfg(feature = "config")]
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, ErrorKind};

/// Tracing target for error classification.
const TRACING_TARGET: &str = "hanyeok_core::classify";

/// Deployment environment of the running service.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Diagnostic details are attached to server-side failures.
    #[default]
    Development,
    /// Clients only ever see generic messages.
    Production,
}

impl Environment {
    /// Returns whether diagnostic details may be exposed.
    #[must_use]
    pub const fn exposes_details(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// The single client-facing outcome of a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The error kind.
    pub kind: ErrorKind,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Message safe to show to the client.
    pub message: Cow<'static, str>,
    /// Suggested HTTP status.
    pub status: u16,
    /// Diagnostic detail, only present outside production.
    pub detail: Option<String>,
}

impl Classification {
    /// Creates a classification with the generic message of the kind.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            code: kind.code(),
            message: Cow::Borrowed(kind.user_message()),
            status: kind.status(),
            detail: None,
        }
    }
}

/// Maps failures to [`Classification`]s.
///
/// The mapping is total: errors that are not pipeline [`Error`]s are
/// reported as [`ErrorKind::Internal`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorClassifier {
    environment: Environment,
}

impl ErrorClassifier {
    /// Creates a classifier for the given environment.
    pub const fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Returns the environment of this classifier.
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Classifies a pipeline error.
    pub fn classify(&self, error: &Error) -> Classification {
        let kind = error.kind();
        let mut classification = Classification::from_kind(kind);

        if kind.exposes_message() {
            classification.message = Cow::Owned(error.message().to_owned());
        }

        if kind.is_server_error() && self.environment.exposes_details() {
            classification.detail = Some(error_chain(error));
        }

        if kind.is_server_error() {
            tracing::error!(
                target: TRACING_TARGET,
                kind = %kind,
                code = kind.code(),
                upstream_status = error.upstream_status(),
                error = %error,
                "Translation failed"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET,
                kind = %kind,
                code = kind.code(),
                "Translation request rejected"
            );
        }

        classification
    }

    /// Classifies any error, falling back to [`ErrorKind::Internal`].
    pub fn classify_any(&self, error: &(dyn StdError + 'static)) -> Classification {
        if let Some(error) = error.downcast_ref::<Error>() {
            return self.classify(error);
        }

        tracing::error!(
            target: TRACING_TARGET,
            error = %error,
            "Unclassified failure"
        );

        let mut classification = Classification::from_kind(ErrorKind::Internal);
        if self.environment.exposes_details() {
            classification.detail = Some(error_chain(error));
        }

        classification
    }
}

/// Joins an error and its sources into one line.
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }

    chain
}
