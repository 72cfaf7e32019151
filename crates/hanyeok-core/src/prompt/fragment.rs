use serde::Serialize;
use strum::{AsRefStr, IntoStaticStr};

/// Named section of a prompt.
///
/// The declaration order is the concatenation order: fragments are sorted by
/// kind before rendering, so the persona always comes first and the output
/// rules always follow any user-supplied instruction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// Domain expertise framing.
    Persona,
    /// Detection, translation axes, pronunciation and line rules.
    Task,
    /// Verbatim rule for Korean source text.
    KoreanSource,
    /// Vocabulary study conventions per language.
    WordStudy,
    /// Delimited additional instruction from the user.
    Custom,
    /// Tone sentence.
    Style,
    /// Output format requirements.
    Structure,
    /// The text to translate.
    Source,
}

/// One named section of a composed prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptFragment {
    kind: FragmentKind,
    text: String,
}

impl PromptFragment {
    /// Creates a new fragment.
    pub fn new(kind: FragmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Returns the kind of this fragment.
    #[inline]
    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    /// Returns the text of this fragment.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}
