//! Translation requests and their validation.

mod language;
mod style;
mod validate;

use serde::Serialize;

pub use self::language::{LanguagePolicy, ReadingConvention, TargetLanguage};
pub use self::style::TranslationStyle;
pub use self::validate::{MAX_CUSTOM_PROMPT_CHARS, MAX_TEXT_CHARS, RequestValidator};

/// A fully validated translation request.
///
/// Only produced by [`RequestValidator`]; a request that fails any check is
/// rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    text: String,
    targets: Vec<TargetLanguage>,
    custom_prompt: Option<String>,
    translation_style: Option<TranslationStyle>,
}

impl TranslationRequest {
    /// Returns the source text as submitted.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the requested targets, deduplicated and in request order.
    #[inline]
    pub fn targets(&self) -> &[TargetLanguage] {
        &self.targets
    }

    /// Returns the additional user instruction, if any.
    #[inline]
    pub fn custom_prompt(&self) -> Option<&str> {
        self.custom_prompt.as_deref()
    }

    /// Returns the requested style, if any.
    #[inline]
    pub fn translation_style(&self) -> Option<TranslationStyle> {
        self.translation_style
    }

    /// Returns the non-empty lines of the source text.
    pub fn source_lines(&self) -> Vec<&str> {
        source_lines(&self.text)
    }
}

/// Splits a text into its non-empty lines, in order.
///
/// Each translation axis carries one entry per line returned here.
pub fn source_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_lines_skip_blank_lines() {
        let lines = source_lines("first\n\n  \nsecond\r\nthird\n");
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn source_lines_keep_inner_whitespace() {
        assert_eq!(source_lines("  안녕  "), vec!["  안녕  "]);
    }
}
