//! Rejection of dangerous markup in free text.

use derive_more::{AsRef, Deref, Display};
use regex::RegexSet;
use strum::{AsRefStr, IntoStaticStr};

use crate::{Error, Result};

/// Tracing target for sanitization.
const TRACING_TARGET: &str = "hanyeok_core::sanitize";

/// Patterns that cause a text to be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DangerousPattern {
    /// An opening or closing `<script>` tag.
    ScriptTag,
    /// A `javascript:` or `vbscript:` URI.
    ScriptUri,
    /// An `on<event>=` attribute inside a tag.
    EventHandler,
}

impl DangerousPattern {
    const ALL: [Self; 3] = [Self::ScriptTag, Self::ScriptUri, Self::EventHandler];

    const fn regex(self) -> &'static str {
        match self {
            Self::ScriptTag => r"(?i)<\s*/?\s*script\b",
            Self::ScriptUri => r"(?i)\b(?:java|vb)script\s*:",
            Self::EventHandler => r"(?i)<[a-z][^>\n]*[\s/]on[a-z]+\s*=",
        }
    }
}

/// Text that passed the [`Sanitizer`].
#[derive(Debug, Clone, PartialEq, Eq, AsRef, Deref, Display)]
#[as_ref(str)]
pub struct SanitizedText(String);

impl SanitizedText {
    /// Returns the text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

/// Rejects texts containing any [`DangerousPattern`].
///
/// The policy is reject-on-match: text is never partially stripped. The
/// rejection never echoes the offending fragment.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    patterns: RegexSet,
}

impl Sanitizer {
    /// Compiles the pattern set.
    pub fn new() -> Result<Self> {
        let patterns = RegexSet::new(DangerousPattern::ALL.map(DangerousPattern::regex))
            .map_err(|err| Error::internal("failed to compile sanitizer patterns").with_source(err))?;

        Ok(Self { patterns })
    }

    /// Returns the patterns found in the text.
    pub fn matches(&self, text: &str) -> Vec<DangerousPattern> {
        self.patterns
            .matches(text)
            .into_iter()
            .map(|index| DangerousPattern::ALL[index])
            .collect()
    }

    /// Checks a text, rejecting it if any pattern matches.
    pub fn sanitize(&self, text: &str) -> Result<SanitizedText> {
        let matched = self.matches(text);
        if let Some(pattern) = matched.first() {
            tracing::warn!(
                target: TRACING_TARGET,
                pattern = pattern.as_ref(),
                matches = matched.len(),
                "Rejected input with dangerous pattern"
            );

            return Err(Error::invalid_input());
        }

        Ok(SanitizedText(text.to_owned()))
    }
}
