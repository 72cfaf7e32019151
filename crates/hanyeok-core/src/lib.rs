#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the translation pipeline.
pub const TRACING_TARGET_PIPELINE: &str = "hanyeok_core::pipeline";

/// Tracing target for language model calls.
pub const TRACING_TARGET_GATEWAY: &str = "hanyeok_core::gateway";

mod classify;
mod error;
mod health;
mod pipeline;

pub mod gateway;
pub mod prompt;
pub mod request;
pub mod response;
pub mod sanitize;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use classify::{Classification, Environment, ErrorClassifier};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
pub use pipeline::Translator;
