#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client operations.
pub const TRACING_TARGET_CLIENT: &str = "hanyeok_gemini::client";

mod client;
mod config;
mod error;
mod wire;

pub use crate::client::GeminiClient;
pub use crate::config::{GeminiConfig, defaults};
pub use crate::error::{Error, Result};
