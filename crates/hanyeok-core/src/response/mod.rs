//! Typed translation results and validation of model output.

mod result;
mod validate;

pub use self::result::{
    LinePair, TargetTranslation, TranslationResult, WordStudyEntry, is_korean,
};
pub use self::validate::ResponseValidator;
