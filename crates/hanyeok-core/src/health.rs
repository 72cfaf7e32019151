//! Health reporting for completion providers.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Operational status of a provider.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Operating normally.
    #[default]
    Healthy,
    /// Operating with issues but still functional.
    Degraded,
    /// Not operational.
    Unhealthy,
}

impl ServiceStatus {
    /// Returns whether requests can still be served.
    #[must_use]
    pub const fn is_operational(self) -> bool {
        !matches!(self, Self::Unhealthy)
    }
}

/// Health information for a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    /// Current status.
    pub status: ServiceStatus,
    /// Time taken by the health check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Duration>,
    /// Optional message describing the current state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When the check was performed.
    pub checked_at: Timestamp,
}

impl ServiceHealth {
    /// Creates a healthy report.
    pub fn healthy() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            response: None,
            message: None,
            checked_at: Timestamp::now(),
        }
    }

    /// Creates a degraded report.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Degraded,
            message: Some(message.into()),
            ..Self::healthy()
        }
    }

    /// Creates an unhealthy report.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            message: Some(message.into()),
            ..Self::healthy()
        }
    }

    /// Sets the response time for this health check.
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response = Some(response_time);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhealthy_is_not_operational() {
        assert!(ServiceHealth::healthy().status.is_operational());
        assert!(ServiceHealth::degraded("slow").status.is_operational());
        assert!(!ServiceHealth::unhealthy("down").status.is_operational());
    }

    #[test]
    fn serializes_camel_case() {
        let health = ServiceHealth::degraded("slow");
        let value = serde_json::to_value(&health).unwrap();

        assert_eq!(value["status"], "degraded");
        assert_eq!(value["message"], "slow");
        assert!(value.get("checkedAt").is_some());
        assert!(value.get("response").is_none());
    }
}
