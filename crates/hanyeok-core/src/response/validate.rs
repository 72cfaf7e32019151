//! Checking raw model output against the expected result shape.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{LinePair, TargetTranslation, TranslationResult, WordStudyEntry, is_korean};
use crate::prompt::{DETECTED_LANGUAGE_FIELD, KOREAN_TRANSLATION_FIELD};
use crate::request::{ReadingConvention, TargetLanguage};
use crate::{Error, Result};

/// Tracing target for response validation.
const TRACING_TARGET: &str = "hanyeok_core::response";

/// Decodes raw completion text into a [`TranslationResult`].
///
/// Malformed content yields a parse error; a missing required field, a
/// missing line or a wrong line count yields an incomplete result error.
/// Nothing is guessed. Two conventions are applied to the decoded value:
///
/// - when the source is Korean, the Korean axis is the source lines
///   verbatim;
/// - English word study entries carry an empty Hangul pronunciation.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    targets: Vec<TargetLanguage>,
    source_lines: Vec<String>,
}

/// Entry of a translation axis with every field optional, so that missing
/// fields can be told apart from mistyped ones.
#[derive(Deserialize)]
struct RawLinePair {
    translation: Option<String>,
    pronunciation: Option<String>,
}

/// Word study entry with the required fields optional, for the same reason.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWordStudyEntry {
    original_word: Option<String>,
    korean_meaning: Option<String>,
    #[serde(default)]
    reading: Option<String>,
    #[serde(default)]
    korean_pronunciation: Option<String>,
}

impl ResponseValidator {
    /// Creates a validator for the given targets and non-empty source lines.
    pub fn new<'a>(
        targets: &[TargetLanguage],
        source_lines: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            targets: targets.to_vec(),
            source_lines: source_lines.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Returns the number of entries each axis must have.
    pub fn expected_lines(&self) -> usize {
        self.source_lines.len()
    }

    /// Validates a raw completion.
    pub fn validate(&self, raw: &str) -> Result<TranslationResult> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|err| Error::parse("model output is not valid JSON").with_source(err))?;

        let Value::Object(fields) = value else {
            return Err(Error::parse("model output is not a JSON object"));
        };

        let detected_language = match fields.get(DETECTED_LANGUAGE_FIELD) {
            None | Some(Value::Null) => {
                return Err(Error::incomplete("detectedLanguage is missing"));
            }
            Some(Value::String(detected)) if detected.trim().is_empty() => {
                return Err(Error::incomplete("detectedLanguage is empty"));
            }
            Some(Value::String(detected)) => detected.trim().to_owned(),
            Some(_) => return Err(Error::parse("detectedLanguage is not a string")),
        };

        let mut korean = self.lines(&fields, KOREAN_TRANSLATION_FIELD)?;
        if is_korean(&detected_language) {
            for (pair, source) in korean.iter_mut().zip(&self.source_lines) {
                if &pair.translation != source {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        "Replacing altered Korean line with the source line"
                    );
                    pair.translation.clone_from(source);
                }
                if pair.pronunciation.trim().is_empty() {
                    pair.pronunciation.clone_from(source);
                }
            }
        }

        let mut targets = Vec::with_capacity(self.targets.len());
        for language in &self.targets {
            let lines = self.lines(&fields, &language.translation_field())?;
            let word_study = match language.reading_convention() {
                Some(convention) => Some(word_study(&fields, language, convention)?),
                None => None,
            };

            targets.push(TargetTranslation {
                language: language.clone(),
                lines,
                word_study,
            });
        }

        Ok(TranslationResult {
            detected_language,
            korean,
            targets,
        })
    }

    /// Decodes one translation axis and checks its line count.
    fn lines(&self, fields: &Map<String, Value>, field: &str) -> Result<Vec<LinePair>> {
        let raw: Vec<RawLinePair> = required_list(fields, field)?;

        if raw.len() != self.expected_lines() {
            return Err(Error::incomplete(format!(
                "{field} has {} entries, expected {}",
                raw.len(),
                self.expected_lines()
            )));
        }

        raw.into_iter()
            .enumerate()
            .map(|(index, pair)| match (pair.translation, pair.pronunciation) {
                (Some(translation), Some(pronunciation)) => Ok(LinePair {
                    translation,
                    pronunciation,
                }),
                _ => Err(Error::incomplete(format!(
                    "{field}[{index}] lacks translation or pronunciation"
                ))),
            })
            .collect()
    }
}

/// Decodes an optional word study list; a missing list is an empty one.
fn word_study(
    fields: &Map<String, Value>,
    language: &TargetLanguage,
    convention: ReadingConvention,
) -> Result<Vec<WordStudyEntry>> {
    let field = language.word_study_field();
    let raw: Vec<RawWordStudyEntry> = match fields.get(&field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(value) => decode(value, &field)?,
    };

    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let (Some(original_word), Some(korean_meaning)) =
                (entry.original_word, entry.korean_meaning)
            else {
                return Err(Error::incomplete(format!(
                    "{field}[{index}] lacks originalWord or koreanMeaning"
                )));
            };

            let korean_pronunciation = if convention.has_korean_pronunciation() {
                entry.korean_pronunciation.unwrap_or_default()
            } else {
                String::new()
            };

            Ok(WordStudyEntry {
                original_word,
                korean_meaning,
                reading: entry.reading.unwrap_or_default(),
                korean_pronunciation,
            })
        })
        .collect()
}

fn required_list<T: DeserializeOwned>(fields: &Map<String, Value>, field: &str) -> Result<Vec<T>> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(Error::incomplete(format!("{field} is missing"))),
        Some(value) => decode(value, field),
    }
}

fn decode<T: DeserializeOwned>(value: &Value, field: &str) -> Result<Vec<T>> {
    Vec::<T>::deserialize(value)
        .map_err(|err| Error::parse(format!("{field} has an unexpected shape")).with_source(err))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    fn validator(targets: &[TargetLanguage], text: &str) -> ResponseValidator {
        ResponseValidator::new(targets, crate::request::source_lines(text))
    }

    fn english_output() -> Value {
        json!({
            "detectedLanguage": "Korean",
            "koreanTranslation": [{ "translation": "안녕하세요", "pronunciation": "안녕하세요" }],
            "englishTranslation": [{ "translation": "Hello", "pronunciation": "헬로" }],
            "englishWordStudy": [{
                "originalWord": "hello",
                "koreanMeaning": "안녕",
                "reading": "/həˈloʊ/",
                "koreanPronunciation": ""
            }]
        })
    }

    #[test]
    fn accepts_complete_output() {
        let result = validator(&[TargetLanguage::English], "안녕하세요")
            .validate(&english_output().to_string())
            .unwrap();

        assert!(result.is_korean_source());
        assert_eq!(result.korean.len(), 1);

        let english = result.target(&TargetLanguage::English).unwrap();
        assert_eq!(english.lines[0].translation, "Hello");
        let study = english.word_study.as_ref().unwrap();
        assert_eq!(study[0].reading, "/həˈloʊ/");
        assert_eq!(study[0].korean_pronunciation, "");
    }

    #[test]
    fn malformed_output_is_parse_error() {
        let validator = validator(&[TargetLanguage::English], "hi");

        assert_eq!(validator.validate("not json").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(validator.validate("[1, 2]").unwrap_err().kind(), ErrorKind::Parse);

        let mut output = english_output();
        output["englishTranslation"] = json!("Hello");
        assert_eq!(
            validator.validate(&output.to_string()).unwrap_err().kind(),
            ErrorKind::Parse
        );
    }

    #[test]
    fn missing_required_field_is_incomplete() {
        let validator = validator(&[TargetLanguage::English], "안녕하세요");

        for field in ["detectedLanguage", "koreanTranslation", "englishTranslation"] {
            let mut output = english_output();
            output.as_object_mut().unwrap().remove(field);

            let error = validator.validate(&output.to_string()).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::IncompleteResult, "field {field}");
        }
    }

    #[test]
    fn missing_line_field_is_incomplete() {
        let mut output = english_output();
        output["englishTranslation"] = json!([{ "translation": "Hello" }]);

        let error = validator(&[TargetLanguage::English], "안녕하세요")
            .validate(&output.to_string())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IncompleteResult);
    }

    #[test]
    fn line_count_must_match_source() {
        let output = json!({
            "detectedLanguage": "English",
            "koreanTranslation": [{ "translation": "하나 둘 셋", "pronunciation": "하나 둘 셋" }],
            "englishTranslation": [{ "translation": "one two three", "pronunciation": "원 투 쓰리" }]
        });

        let error = validator(&[TargetLanguage::English], "one\ntwo\nthree")
            .validate(&output.to_string())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IncompleteResult);
        assert!(error.message().contains("expected 3"));
    }

    #[test]
    fn korean_source_is_kept_verbatim() {
        let output = json!({
            "detectedLanguage": "Korean",
            "koreanTranslation": [
                { "translation": "안녕하세요!", "pronunciation": "안녕하세요" },
                { "translation": "반갑습니다", "pronunciation": "" }
            ],
            "englishTranslation": [
                { "translation": "Hello", "pronunciation": "헬로" },
                { "translation": "Nice to meet you", "pronunciation": "나이스 투 밋 유" }
            ]
        });

        let result = validator(&[TargetLanguage::English], "안녕하세요\n반갑습니다")
            .validate(&output.to_string())
            .unwrap();

        assert_eq!(result.korean[0].translation, "안녕하세요");
        assert_eq!(result.korean[1].translation, "반갑습니다");
        assert_eq!(result.korean[1].pronunciation, "반갑습니다");
    }

    #[test]
    fn non_korean_source_is_left_alone() {
        let output = json!({
            "detectedLanguage": "English",
            "koreanTranslation": [{ "translation": "안녕", "pronunciation": "안녕" }],
            "japaneseTranslation": [{ "translation": "こんにちは", "pronunciation": "곤니치와" }]
        });

        let result = validator(&[TargetLanguage::Japanese], "hello")
            .validate(&output.to_string())
            .unwrap();

        assert_eq!(result.korean[0].translation, "안녕");
        let japanese = result.target(&TargetLanguage::Japanese).unwrap();
        assert_eq!(japanese.word_study, Some(Vec::new()));
    }

    #[test]
    fn word_study_follows_language() {
        let french = TargetLanguage::Other("French".into());
        let output = json!({
            "detectedLanguage": "English",
            "koreanTranslation": [{ "translation": "안녕", "pronunciation": "안녕" }],
            "frenchTranslation": [{ "translation": "Bonjour", "pronunciation": "봉주르" }],
            "frenchWordStudy": [{ "originalWord": "bonjour", "koreanMeaning": "안녕" }]
        });

        let result = validator(std::slice::from_ref(&french), "hello")
            .validate(&output.to_string())
            .unwrap();
        assert_eq!(result.target(&french).unwrap().word_study, None);
    }

    #[test]
    fn word_study_entries_need_word_and_meaning() {
        let mut output = english_output();
        output["englishWordStudy"] = json!([{ "originalWord": "hello" }]);

        let error = validator(&[TargetLanguage::English], "안녕하세요")
            .validate(&output.to_string())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IncompleteResult);
    }

    #[test]
    fn english_pronunciation_is_cleared() {
        let mut output = english_output();
        output["englishWordStudy"][0]["koreanPronunciation"] = json!("헬로");

        let result = validator(&[TargetLanguage::English], "안녕하세요")
            .validate(&output.to_string())
            .unwrap();
        let study = result.target(&TargetLanguage::English).unwrap();
        assert_eq!(study.word_study.as_ref().unwrap()[0].korean_pronunciation, "");
    }
}
