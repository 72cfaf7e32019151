use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::prompt::{DETECTED_LANGUAGE_FIELD, KOREAN_TRANSLATION_FIELD};
use crate::request::TargetLanguage;

/// One translated line and its Hangul pronunciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePair {
    pub translation: String,
    pub pronunciation: String,
}

/// One vocabulary entry of a word study list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStudyEntry {
    pub original_word: String,
    pub korean_meaning: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default)]
    pub korean_pronunciation: String,
}

/// Translation of the source into one requested target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTranslation {
    pub language: TargetLanguage,
    pub lines: Vec<LinePair>,
    /// Present exactly when the language has a word study convention.
    pub word_study: Option<Vec<WordStudyEntry>>,
}

/// Validated output of one translation.
///
/// Serializes to the same flat shape the model produces: `detectedLanguage`,
/// `koreanTranslation` and one `<language>Translation` field per target,
/// plus `<language>WordStudy` for Japanese, Chinese and English.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub detected_language: String,
    pub korean: Vec<LinePair>,
    pub targets: Vec<TargetTranslation>,
}

impl TranslationResult {
    /// Returns the translation for a target language.
    pub fn target(&self, language: &TargetLanguage) -> Option<&TargetTranslation> {
        self.targets.iter().find(|target| &target.language == language)
    }

    /// Returns whether the detected source language is Korean.
    pub fn is_korean_source(&self) -> bool {
        is_korean(&self.detected_language)
    }
}

impl Serialize for TranslationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let word_studies = self
            .targets
            .iter()
            .filter(|target| target.word_study.is_some())
            .count();

        let mut map = serializer.serialize_map(Some(2 + self.targets.len() + word_studies))?;
        map.serialize_entry(DETECTED_LANGUAGE_FIELD, &self.detected_language)?;
        map.serialize_entry(KOREAN_TRANSLATION_FIELD, &self.korean)?;

        for target in &self.targets {
            map.serialize_entry(&target.language.translation_field(), &target.lines)?;
            if let Some(word_study) = &target.word_study {
                map.serialize_entry(&target.language.word_study_field(), word_study)?;
            }
        }

        map.end()
    }
}

/// Returns whether a detected language name denotes Korean.
pub fn is_korean(detected: &str) -> bool {
    let detected = detected.trim().to_lowercase();
    detected.starts_with("korean") || matches!(detected.as_str(), "ko" | "kor" | "한국어")
}
