//! Middleware for `axum::Router` and HTTP request processing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use hanyeok_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_observability()
//!     .with_default_security();
//! ```

mod observability;
mod recovery;
mod security;

pub use crate::middleware::observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use crate::middleware::recovery::{RecoveryConfig, RouterRecoveryExt};
pub use crate::middleware::security::{CorsConfig, RouterSecurityExt, SecurityHeadersConfig};

/// Maximum accepted request body size: 64 KiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;
