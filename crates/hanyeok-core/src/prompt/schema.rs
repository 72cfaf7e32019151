//! Structured-output schema sent alongside the prompt.
//!
//! The schema uses the uppercase type names of the Gemini `responseSchema`
//! dialect. It mirrors [`TranslationResult`](crate::response::TranslationResult).

use serde_json::{Map, Value, json};

use crate::request::TargetLanguage;

/// Field holding the detected source language.
pub const DETECTED_LANGUAGE_FIELD: &str = "detectedLanguage";

/// Field holding the Korean translation axis.
pub const KOREAN_TRANSLATION_FIELD: &str = "koreanTranslation";

/// Builds the output schema for the given targets.
///
/// Every translation axis is required; word study lists never are.
pub fn output_schema(targets: &[TargetLanguage]) -> Value {
    let mut properties = Map::new();
    properties.insert(DETECTED_LANGUAGE_FIELD.into(), json!({ "type": "STRING" }));
    properties.insert(KOREAN_TRANSLATION_FIELD.into(), line_pairs());

    for target in targets {
        properties.insert(target.translation_field(), line_pairs());
        if target.has_word_study() {
            properties.insert(target.word_study_field(), word_study());
        }
    }

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required_fields(targets),
    })
}

/// Returns the top-level required fields for the given targets.
pub fn required_fields(targets: &[TargetLanguage]) -> Vec<String> {
    let mut required = vec![
        DETECTED_LANGUAGE_FIELD.to_owned(),
        KOREAN_TRANSLATION_FIELD.to_owned(),
    ];
    required.extend(targets.iter().map(TargetLanguage::translation_field));
    required
}

fn line_pairs() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "translation": { "type": "STRING" },
                "pronunciation": { "type": "STRING" }
            },
            "required": ["translation", "pronunciation"]
        }
    })
}

fn word_study() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "originalWord": { "type": "STRING" },
                "koreanMeaning": { "type": "STRING" },
                "reading": { "type": "STRING" },
                "koreanPronunciation": { "type": "STRING" }
            },
            "required": ["originalWord", "koreanMeaning"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_every_axis_but_no_word_study() {
        let schema = output_schema(&[TargetLanguage::English, TargetLanguage::Japanese]);

        assert_eq!(
            schema["required"],
            json!([
                "detectedLanguage",
                "koreanTranslation",
                "englishTranslation",
                "japaneseTranslation"
            ])
        );
        assert!(schema["properties"]["englishWordStudy"].is_object());
        assert!(schema["properties"]["japaneseWordStudy"].is_object());
    }

    #[test]
    fn other_languages_have_no_word_study() {
        let schema = output_schema(&[TargetLanguage::Other("French".into())]);

        assert!(schema["properties"]["frenchTranslation"].is_object());
        assert!(schema["properties"].get("frenchWordStudy").is_none());
    }

    #[test]
    fn word_study_items_require_word_and_meaning() {
        let schema = output_schema(&[TargetLanguage::Chinese]);
        let items = &schema["properties"]["chineseWordStudy"]["items"];

        assert_eq!(items["required"], json!(["originalWord", "koreanMeaning"]));
        assert_eq!(items["properties"]["reading"]["type"], "STRING");
    }
}
