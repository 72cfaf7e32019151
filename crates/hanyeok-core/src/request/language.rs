//! Target languages and their phonetic conventions.

use std::fmt;

#[cfg(feature = "config")]
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Maximum length of a free-form language name in open mode.
const MAX_LANGUAGE_NAME_CHARS: usize = 40;

/// Whether target languages are restricted to the supported set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LanguagePolicy {
    /// Only Japanese, Chinese and English are accepted.
    #[default]
    Closed,
    /// Any plainly written language name is accepted.
    Open,
}

/// How the word study `reading` field is written for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingConvention {
    /// Hiragana reading of Kanji words, plus a Hangul pronunciation.
    Hiragana,
    /// Tone-marked Pinyin, plus a Hangul rendering.
    Pinyin,
    /// IPA transcription, with an empty Hangul pronunciation.
    Ipa,
}

impl ReadingConvention {
    /// Returns whether the Hangul pronunciation field is filled.
    #[must_use]
    pub const fn has_korean_pronunciation(self) -> bool {
        !matches!(self, Self::Ipa)
    }
}

/// A language a text is translated into, besides Korean.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Japanese,
    Chinese,
    English,
    /// Any other language, only accepted under [`LanguagePolicy::Open`].
    Other(String),
}

impl TargetLanguage {
    /// Languages accepted under [`LanguagePolicy::Closed`].
    pub const SUPPORTED: [Self; 3] = [Self::Japanese, Self::Chinese, Self::English];

    /// Parses a language selector under the given policy.
    pub fn parse(raw: &str, policy: LanguagePolicy) -> Result<Self> {
        let name = raw.trim();
        let lowered = name.to_lowercase();

        match lowered.as_str() {
            "japanese" | "ja" | "일본어" => return Ok(Self::Japanese),
            "chinese" | "zh" | "중국어" => return Ok(Self::Chinese),
            "english" | "en" | "영어" => return Ok(Self::English),
            "korean" | "ko" | "한국어" => {
                return Err(Error::validation(
                    "targetLanguage cannot be Korean: the Korean translation is always included",
                ));
            }
            _ => {}
        }

        if policy == LanguagePolicy::Closed {
            return Err(Error::validation(format!(
                "Unsupported language: targetLanguage must be one of {}",
                Self::SUPPORTED
                    .iter()
                    .map(Self::name)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let plain = name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == ' ' || c == '-');
        let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

        if !plain || !starts_with_letter || name.chars().count() > MAX_LANGUAGE_NAME_CHARS {
            return Err(Error::validation(format!(
                "Unsupported language: targetLanguage must be a language name of at most \
                 {MAX_LANGUAGE_NAME_CHARS} letters"
            )));
        }

        Ok(Self::Other(name.to_owned()))
    }

    /// Returns the English name of the language.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Japanese => "Japanese",
            Self::Chinese => "Chinese",
            Self::English => "English",
            Self::Other(name) => name,
        }
    }

    /// Returns the word study reading convention, if the language has one.
    #[must_use]
    pub const fn reading_convention(&self) -> Option<ReadingConvention> {
        match self {
            Self::Japanese => Some(ReadingConvention::Hiragana),
            Self::Chinese => Some(ReadingConvention::Pinyin),
            Self::English => Some(ReadingConvention::Ipa),
            Self::Other(_) => None,
        }
    }

    /// Returns whether a word study list is produced for this language.
    #[must_use]
    pub const fn has_word_study(&self) -> bool {
        self.reading_convention().is_some()
    }

    /// Output field holding the line-by-line translation, e.g. `englishTranslation`.
    #[must_use]
    pub fn translation_field(&self) -> String {
        format!("{}Translation", self.field_stem())
    }

    /// Output field holding the word study list, e.g. `englishWordStudy`.
    #[must_use]
    pub fn word_study_field(&self) -> String {
        format!("{}WordStudy", self.field_stem())
    }

    /// Lower camel case form of the name: `Brazilian Portuguese` becomes
    /// `brazilianPortuguese`.
    fn field_stem(&self) -> String {
        let mut stem = String::new();
        for (i, word) in self
            .name()
            .split([' ', '-'])
            .filter(|word| !word.is_empty())
            .enumerate()
        {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                if i == 0 {
                    stem.push(first.to_ascii_lowercase());
                } else {
                    stem.push(first.to_ascii_uppercase());
                }
                stem.extend(chars.map(|c| c.to_ascii_lowercase()));
            }
        }

        stem
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TargetLanguage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
