//! Ordered, short-circuiting checks on raw JSON requests.

use serde_json::{Map, Value};

use super::{LanguagePolicy, TargetLanguage, TranslationRequest, TranslationStyle};
use crate::{Error, Result};

/// Maximum number of characters in the source text.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Maximum number of characters in the additional user instruction.
pub const MAX_CUSTOM_PROMPT_CHARS: usize = 500;

/// Validates raw request bodies into [`TranslationRequest`]s.
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. the body is a non-empty JSON object;
/// 2. `text` is a string that is not blank;
/// 3. `text` has at most [`MAX_TEXT_CHARS`] characters;
/// 4. `targetLanguage` or `targetLanguages` names allowed languages;
/// 5. `customPrompt` is a string of at most [`MAX_CUSTOM_PROMPT_CHARS`] characters;
/// 6. `translationStyle` is a known style.
///
/// When no target is given, English is used.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestValidator {
    policy: LanguagePolicy,
}

impl RequestValidator {
    /// Creates a validator with the given target language policy.
    pub const fn new(policy: LanguagePolicy) -> Self {
        Self { policy }
    }

    /// Returns the target language policy.
    pub const fn policy(&self) -> LanguagePolicy {
        self.policy
    }

    /// Validates a raw request body.
    pub fn validate(&self, body: &Value) -> Result<TranslationRequest> {
        let fields = match body {
            Value::Object(fields) if !fields.is_empty() => fields,
            _ => return Err(Error::validation("Request body must be a non-empty JSON object")),
        };

        let text = match fields.get("text") {
            None | Some(Value::Null) => return Err(Error::validation("text is required")),
            Some(Value::String(text)) => text,
            Some(_) => return Err(Error::validation("text must be a string")),
        };

        if text.trim().is_empty() {
            return Err(Error::validation("text must not be empty"));
        }

        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(Error::validation(format!(
                "text must be at most {MAX_TEXT_CHARS} characters long"
            )));
        }

        let targets = self.targets(fields)?;
        let custom_prompt = custom_prompt(fields)?;
        let translation_style = translation_style(fields)?;

        Ok(TranslationRequest {
            text: text.clone(),
            targets,
            custom_prompt,
            translation_style,
        })
    }

    fn targets(&self, fields: &Map<String, Value>) -> Result<Vec<TargetLanguage>> {
        let single = fields.get("targetLanguage").filter(|value| !value.is_null());
        let multiple = fields.get("targetLanguages").filter(|value| !value.is_null());

        let raw: Vec<&Value> = match (single, multiple) {
            (Some(_), Some(_)) => {
                return Err(Error::validation(
                    "Specify either targetLanguage or targetLanguages, not both",
                ));
            }
            (Some(value), None) => vec![value],
            (None, Some(Value::Array(values))) if values.is_empty() => {
                return Err(Error::validation("targetLanguages must not be empty"));
            }
            (None, Some(Value::Array(values))) => values.iter().collect(),
            (None, Some(_)) => {
                return Err(Error::validation("targetLanguages must be an array of strings"));
            }
            (None, None) => return Ok(vec![TargetLanguage::English]),
        };

        let mut targets: Vec<TargetLanguage> = Vec::with_capacity(raw.len());
        for value in raw {
            let Value::String(name) = value else {
                return Err(Error::validation("targetLanguage must be a string"));
            };

            let target = TargetLanguage::parse(name, self.policy)?;
            let field = target.translation_field();
            if !targets.iter().any(|seen| seen.translation_field() == field) {
                targets.push(target);
            }
        }

        Ok(targets)
    }
}

fn custom_prompt(fields: &Map<String, Value>) -> Result<Option<String>> {
    let prompt = match fields.get("customPrompt") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(prompt)) => prompt,
        Some(_) => return Err(Error::validation("customPrompt must be a string")),
    };

    if prompt.chars().count() > MAX_CUSTOM_PROMPT_CHARS {
        return Err(Error::validation(format!(
            "customPrompt must be at most {MAX_CUSTOM_PROMPT_CHARS} characters long"
        )));
    }

    if prompt.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(prompt.clone()))
}

fn translation_style(fields: &Map<String, Value>) -> Result<Option<TranslationStyle>> {
    use strum::VariantNames;

    match fields.get("translationStyle") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(style)) => style.trim().parse::<TranslationStyle>().map(Some).map_err(|_| {
            Error::validation(format!(
                "translationStyle must be one of {}",
                TranslationStyle::VARIANTS.join(", ")
            ))
        }),
        Some(_) => Err(Error::validation("translationStyle must be a string")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    fn validate(body: Value) -> Result<TranslationRequest> {
        RequestValidator::default().validate(&body)
    }

    fn message(body: Value) -> String {
        let error = validate(body).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        error.message().to_owned()
    }

    #[test]
    fn accepts_minimal_request() {
        let request = validate(json!({ "text": "안녕하세요", "targetLanguage": "English" })).unwrap();
        assert_eq!(request.text(), "안녕하세요");
        assert_eq!(request.targets(), &[TargetLanguage::English]);
        assert_eq!(request.custom_prompt(), None);
        assert_eq!(request.translation_style(), None);
    }

    #[test]
    fn defaults_target_to_english() {
        let request = validate(json!({ "text": "hello" })).unwrap();
        assert_eq!(request.targets(), &[TargetLanguage::English]);
    }

    #[test]
    fn rejects_empty_body() {
        assert!(message(Value::Null).contains("non-empty"));
        assert!(message(json!({})).contains("non-empty"));
        assert!(message(json!([1, 2])).contains("non-empty"));
    }

    #[test]
    fn rejects_missing_or_blank_text() {
        assert_eq!(message(json!({ "targetLanguage": "English" })), "text is required");
        assert_eq!(message(json!({ "text": 42 })), "text must be a string");
        assert_eq!(message(json!({ "text": "  \n\t " })), "text must not be empty");
    }

    #[test]
    fn rejects_long_text() {
        let text = "가".repeat(MAX_TEXT_CHARS + 1);
        assert!(message(json!({ "text": text })).contains("at most 5000"));

        let text = "가".repeat(MAX_TEXT_CHARS);
        assert!(validate(json!({ "text": text })).is_ok());
    }

    #[test]
    fn length_counts_surrounding_whitespace() {
        let text = format!("{}  ", "a".repeat(MAX_TEXT_CHARS - 1));
        assert!(message(json!({ "text": text })).contains("at most"));
    }

    #[test]
    fn rejects_unsupported_language() {
        let text = message(json!({ "text": "hi", "targetLanguage": "Klingon" }));
        assert!(text.starts_with("Unsupported language"));
    }

    #[test]
    fn open_policy_accepts_other_languages() {
        let validator = RequestValidator::new(LanguagePolicy::Open);
        let request = validator
            .validate(&json!({ "text": "hi", "targetLanguage": "French" }))
            .unwrap();
        assert_eq!(request.targets(), &[TargetLanguage::Other("French".into())]);
    }

    #[test]
    fn multiple_targets_are_deduplicated_in_order() {
        let request = validate(json!({
            "text": "hi",
            "targetLanguages": ["Japanese", "english", "ja", "Chinese"]
        }))
        .unwrap();

        assert_eq!(
            request.targets(),
            &[
                TargetLanguage::Japanese,
                TargetLanguage::English,
                TargetLanguage::Chinese
            ]
        );
    }

    #[test]
    fn rejects_conflicting_or_empty_target_lists() {
        assert!(message(json!({
            "text": "hi",
            "targetLanguage": "English",
            "targetLanguages": ["Japanese"]
        }))
        .contains("either"));
        assert!(message(json!({ "text": "hi", "targetLanguages": [] })).contains("empty"));
        assert!(message(json!({ "text": "hi", "targetLanguages": "English" })).contains("array"));
        assert!(message(json!({ "text": "hi", "targetLanguages": [1] })).contains("string"));
    }

    #[test]
    fn validates_custom_prompt() {
        let prompt = "x".repeat(MAX_CUSTOM_PROMPT_CHARS + 1);
        assert!(message(json!({ "text": "hi", "customPrompt": prompt })).contains("customPrompt"));
        assert!(message(json!({ "text": "hi", "customPrompt": 1 })).contains("customPrompt"));

        let request = validate(json!({ "text": "hi", "customPrompt": "Keep it short" })).unwrap();
        assert_eq!(request.custom_prompt(), Some("Keep it short"));

        let request = validate(json!({ "text": "hi", "customPrompt": "   " })).unwrap();
        assert_eq!(request.custom_prompt(), None);
    }

    #[test]
    fn validates_translation_style() {
        let text = message(json!({ "text": "hi", "translationStyle": "unknown" }));
        assert!(text.contains("translationStyle"));
        assert!(text.contains("formal"));

        let request = validate(json!({ "text": "hi", "translationStyle": "business" })).unwrap();
        assert_eq!(request.translation_style(), Some(TranslationStyle::Business));
    }

    #[test]
    fn blank_translation_style_is_rejected() {
        for style in ["", "   "] {
            let text = message(json!({ "text": "hi", "translationStyle": style }));
            assert!(text.contains("translationStyle must be one of"));
        }

        let request = validate(json!({ "text": "hi", "translationStyle": null })).unwrap();
        assert_eq!(request.translation_style(), None);
    }

    #[test]
    fn checks_run_in_order() {
        // Long text is reported before the unsupported language.
        let text = "a".repeat(MAX_TEXT_CHARS + 1);
        let body = json!({ "text": text, "targetLanguage": "Klingon", "translationStyle": "x" });
        assert!(message(body).starts_with("text"));

        // Language is reported before the style.
        let body = json!({ "text": "hi", "targetLanguage": "Klingon", "translationStyle": "x" });
        assert!(message(body).starts_with("Unsupported"));
    }
}
