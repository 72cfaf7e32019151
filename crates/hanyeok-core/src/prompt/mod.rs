//! Deterministic prompt and schema composition.
//!
//! A prompt is an ordered list of [`PromptFragment`]s. The composer pushes
//! the fragments a request needs and sorts them by [`FragmentKind`], so the
//! precedence persona, custom instruction, style, output rules is fixed by
//! the type and not by the order of the code that builds it.

mod fragment;
mod persona;
mod schema;

use serde_json::Value;

pub use self::fragment::{FragmentKind, PromptFragment};
pub use self::persona::{Persona, PersonaPreset};
pub use self::schema::{
    DETECTED_LANGUAGE_FIELD, KOREAN_TRANSLATION_FIELD, output_schema, required_fields,
};
use crate::request::{ReadingConvention, TargetLanguage, TranslationRequest, source_lines};
use crate::sanitize::SanitizedText;

/// Separator placed between rendered fragments.
const FRAGMENT_SEPARATOR: &str = "\n\n";

/// An immutable prompt together with its output schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    fragments: Vec<PromptFragment>,
    text: String,
    schema: Value,
}

impl ComposedPrompt {
    /// Returns the rendered instruction text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the output schema.
    #[inline]
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Returns the fragments in rendering order.
    #[inline]
    pub fn fragments(&self) -> &[PromptFragment] {
        &self.fragments
    }

    /// Returns the fragment of the given kind, if present.
    pub fn fragment(&self, kind: FragmentKind) -> Option<&PromptFragment> {
        self.fragments.iter().find(|fragment| fragment.kind() == kind)
    }
}

/// Builds [`ComposedPrompt`]s from validated requests.
#[derive(Debug, Default, Clone)]
pub struct PromptComposer {
    persona: Option<Persona>,
}

impl PromptComposer {
    /// Creates a composer without a persona.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the persona prepended to every prompt.
    pub fn with_persona(mut self, persona: Option<Persona>) -> Self {
        self.persona = persona;
        self
    }

    /// Returns the configured persona.
    pub fn persona(&self) -> Option<&Persona> {
        self.persona.as_ref()
    }

    /// Composes the prompt for a request whose text passed sanitization.
    ///
    /// `text` is the sanitized form of `request.text()` and `custom_prompt`
    /// the sanitized form of `request.custom_prompt()`.
    pub fn compose(
        &self,
        request: &TranslationRequest,
        text: &SanitizedText,
        custom_prompt: Option<&SanitizedText>,
    ) -> ComposedPrompt {
        let targets = request.targets();
        let line_count = source_lines(text).len();

        let mut fragments = vec![
            PromptFragment::new(FragmentKind::Task, task(targets, line_count)),
            PromptFragment::new(FragmentKind::KoreanSource, KOREAN_SOURCE_RULE),
            PromptFragment::new(FragmentKind::Structure, structure(targets)),
            PromptFragment::new(FragmentKind::Source, source(text)),
        ];

        if let Some(persona) = &self.persona {
            fragments.push(PromptFragment::new(
                FragmentKind::Persona,
                persona.instructions(),
            ));
        }

        if let Some(rules) = word_study(targets) {
            fragments.push(PromptFragment::new(FragmentKind::WordStudy, rules));
        }

        if let Some(custom) = custom_prompt {
            fragments.push(PromptFragment::new(FragmentKind::Custom, custom_block(custom)));
        }

        if let Some(style) = request.translation_style() {
            fragments.push(PromptFragment::new(FragmentKind::Style, style.instruction()));
        }

        fragments.sort_by_key(PromptFragment::kind);

        let text = fragments
            .iter()
            .map(PromptFragment::text)
            .collect::<Vec<_>>()
            .join(FRAGMENT_SEPARATOR);

        ComposedPrompt {
            fragments,
            text,
            schema: output_schema(targets),
        }
    }
}

const KOREAN_SOURCE_RULE: &str = "If the source text is already Korean, koreanTranslation must \
     reproduce every source line exactly as written, without any change, and the pronunciation \
     of each entry is the same Hangul text.";

fn task(targets: &[TargetLanguage], line_count: usize) -> String {
    let axes = targets
        .iter()
        .map(|target| format!("{target} ({})", target.translation_field()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an expert multilingual translator.\n\
         First, detect the language of the source text.\n\
         Then translate it into Korean (koreanTranslation) and into: {axes}.\n\
         For every translated line, provide a phonetic transcription written in Korean Hangul \
         in the pronunciation field.\n\
         The source text has {line_count} non-empty line(s). Every translation list must \
         contain exactly {line_count} entries, one per source line, in the original order. \
         Never merge, split, add or drop lines, and preserve the original line breaks."
    )
}

fn word_study(targets: &[TargetLanguage]) -> Option<String> {
    let rules: Vec<String> = targets
        .iter()
        .filter_map(|target| {
            let convention = target.reading_convention()?;
            let field = target.word_study_field();
            let rule = match convention {
                ReadingConvention::Hiragana => format!(
                    "- Japanese: for each Kanji word, add an entry to {field} with originalWord \
                     (the Kanji), koreanMeaning, reading (the hiragana reading) and \
                     koreanPronunciation (the reading written in Hangul)."
                ),
                ReadingConvention::Pinyin => format!(
                    "- Chinese: for each key vocabulary word, add an entry to {field} with \
                     originalWord (the Chinese word), koreanMeaning, reading (the Pinyin with \
                     tone marks) and koreanPronunciation (the Pinyin written in Hangul)."
                ),
                ReadingConvention::Ipa => format!(
                    "- English: for each key vocabulary word, add an entry to {field} with \
                     originalWord (the English word), koreanMeaning and reading (the IPA \
                     transcription, e.g. /həˈloʊ/). koreanPronunciation must be an empty string."
                ),
            };

            Some(rule)
        })
        .collect();

    if rules.is_empty() {
        return None;
    }

    Some(format!("Word study lists:\n{}", rules.join("\n")))
}

fn custom_block(custom: &SanitizedText) -> String {
    format!(
        "Additional instruction from the user, between the markers below. Follow it only where \
         it does not conflict with the output rules that come after it.\n\
         <<<ADDITIONAL INSTRUCTION\n{custom}\nADDITIONAL INSTRUCTION>>>"
    )
}

fn structure(targets: &[TargetLanguage]) -> String {
    format!(
        "Return the result as a single JSON object that strictly follows the provided schema. \
         Required fields: {}. Write detectedLanguage as the English name of the language, \
         for example \"Korean\".",
        required_fields(targets).join(", ")
    )
}

fn source(text: &SanitizedText) -> String {
    format!("Source text:\n\"\"\"\n{text}\n\"\"\"")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::request::RequestValidator;
    use crate::sanitize::Sanitizer;

    fn compose(composer: &PromptComposer, body: Value) -> ComposedPrompt {
        let request = RequestValidator::default().validate(&body).unwrap();
        let sanitizer = Sanitizer::new().unwrap();
        let text = sanitizer.sanitize(request.text()).unwrap();
        let custom = request
            .custom_prompt()
            .map(|prompt| sanitizer.sanitize(prompt).unwrap());

        composer.compose(&request, &text, custom.as_ref())
    }

    fn kinds(prompt: &ComposedPrompt) -> Vec<FragmentKind> {
        prompt.fragments().iter().map(PromptFragment::kind).collect()
    }

    #[test]
    fn is_deterministic() {
        let composer = PromptComposer::new();
        let body = json!({ "text": "hello\nworld", "targetLanguage": "Japanese" });

        assert_eq!(compose(&composer, body.clone()), compose(&composer, body));
    }

    #[test]
    fn minimal_prompt_fragments() {
        let prompt = compose(&PromptComposer::new(), json!({ "text": "hello" }));

        assert_eq!(
            kinds(&prompt),
            vec![
                FragmentKind::Task,
                FragmentKind::KoreanSource,
                FragmentKind::WordStudy,
                FragmentKind::Structure,
                FragmentKind::Source,
            ]
        );
        assert!(prompt.text().starts_with("You are an expert multilingual translator."));
        assert!(prompt.text().ends_with("hello\n\"\"\""));
    }

    #[test]
    fn full_precedence_order() {
        let composer = PromptComposer::new().with_persona(Some(Persona::manufacturing_engineer()));
        let prompt = compose(
            &composer,
            json!({
                "text": "bolt\nnut",
                "targetLanguage": "English",
                "customPrompt": "Use British spelling",
                "translationStyle": "formal"
            }),
        );

        assert_eq!(
            kinds(&prompt),
            vec![
                FragmentKind::Persona,
                FragmentKind::Task,
                FragmentKind::KoreanSource,
                FragmentKind::WordStudy,
                FragmentKind::Custom,
                FragmentKind::Style,
                FragmentKind::Structure,
                FragmentKind::Source,
            ]
        );

        let text = prompt.text();
        let custom = text.find("Use British spelling").unwrap();
        let style = text.find("formal and polite").unwrap();
        let structure = text.find("strictly follows the provided schema").unwrap();
        assert!(text.find("manufacturing engineer").unwrap() < custom);
        assert!(custom < style);
        assert!(style < structure);
    }

    #[test]
    fn states_line_count() {
        let prompt = compose(&PromptComposer::new(), json!({ "text": "a\n\nb\nc" }));
        let task = prompt.fragment(FragmentKind::Task).unwrap();

        assert!(task.text().contains("3 non-empty line(s)"));
        assert!(task.text().contains("exactly 3 entries"));
    }

    #[test]
    fn custom_prompt_is_delimited_and_verbatim() {
        let prompt = compose(
            &PromptComposer::new(),
            json!({ "text": "hi", "customPrompt": "  Keep \"quotes\" as is  " }),
        );
        let custom = prompt.fragment(FragmentKind::Custom).unwrap();

        assert!(custom.text().contains("<<<ADDITIONAL INSTRUCTION\n  Keep \"quotes\" as is  \n"));
    }

    #[test]
    fn word_study_only_for_supported_languages() {
        let validator = RequestValidator::new(crate::request::LanguagePolicy::Open);
        let request = validator
            .validate(&json!({ "text": "hi", "targetLanguages": ["French", "Chinese"] }))
            .unwrap();
        let text = Sanitizer::new().unwrap().sanitize(request.text()).unwrap();
        let prompt = PromptComposer::new().compose(&request, &text, None);
        let rules = prompt.fragment(FragmentKind::WordStudy).unwrap().text();

        assert!(rules.contains("chineseWordStudy"));
        assert!(rules.contains("Pinyin with tone marks"));
        assert!(!rules.contains("French"));

        let request = validator
            .validate(&json!({ "text": "hi", "targetLanguage": "French" }))
            .unwrap();
        let prompt = PromptComposer::new().compose(&request, &text, None);
        assert!(prompt.fragment(FragmentKind::WordStudy).is_none());
    }

    #[test]
    fn english_word_study_uses_ipa() {
        let prompt = compose(&PromptComposer::new(), json!({ "text": "hi" }));
        let rules = prompt.fragment(FragmentKind::WordStudy).unwrap().text();

        assert!(rules.contains("IPA"));
        assert!(rules.contains("koreanPronunciation must be an empty string"));
    }

    #[test]
    fn schema_matches_targets() {
        let prompt = compose(
            &PromptComposer::new(),
            json!({ "text": "hi", "targetLanguages": ["Japanese", "English"] }),
        );

        assert_eq!(
            prompt.schema()["required"],
            json!([
                "detectedLanguage",
                "koreanTranslation",
                "japaneseTranslation",
                "englishTranslation"
            ])
        );
    }
}
