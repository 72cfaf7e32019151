//! Request extractors.

mod body;

pub use crate::extract::body::JsonBody;
