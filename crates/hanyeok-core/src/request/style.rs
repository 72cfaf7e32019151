use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantNames};

/// Tone requested for the translation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStyle {
    Formal,
    Casual,
    Business,
    Academic,
    Creative,
    Literal,
}

impl TranslationStyle {
    /// Returns the single instruction sentence appended for this style.
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Formal => {
                "Use a formal and polite tone, with honorific expressions wherever the target \
                 language has them."
            }
            Self::Casual => "Use a casual, friendly tone as in everyday conversation.",
            Self::Business => {
                "Use professional business language suitable for workplace communication."
            }
            Self::Academic => {
                "Use precise academic language with accurate technical terminology."
            }
            Self::Creative => {
                "Use expressive, natural phrasing that conveys nuance and emotion rather than a \
                 word-for-word rendering."
            }
            Self::Literal => {
                "Translate as literally as possible, keeping the original structure and word \
                 order wherever the grammar allows."
            }
        }
    }
}
