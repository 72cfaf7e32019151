//! Response envelopes.

use std::borrow::Cow;

use hanyeok_core::response::TranslationResult;
use hanyeok_core::{ServiceHealth, ServiceStatus};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Failure envelope: `{ "error": <message>, "code": <stable code> }`.
#[derive(Debug, Clone, Serialize)]
#[must_use = "error responses do nothing unless serialized"]
pub struct ErrorResponse {
    /// Message safe for client display.
    pub error: Cow<'static, str>,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Diagnostic detail, development only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Success envelope: `{ "success": true, "data": <result> }`.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateResponse {
    pub success: bool,
    pub data: TranslationResult,
}

impl TranslateResponse {
    pub fn new(data: TranslationResult) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub checked_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ServiceHealth> for HealthResponse {
    fn from(health: ServiceHealth) -> Self {
        Self {
            status: health.status,
            checked_at: health.checked_at,
            response_time_ms: health
                .response
                .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
            message: health.message,
        }
    }
}
