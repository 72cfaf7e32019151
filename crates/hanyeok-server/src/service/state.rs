//! Application state and dependency injection.

use std::path::PathBuf;
use std::sync::Arc;

use hanyeok_core::gateway::{CompletionService, GenerationConfig};
use hanyeok_core::{ErrorClassifier, Result, Translator};

use crate::service::ServiceConfig;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    translator: Translator,
    classifier: ErrorClassifier,
    static_dir: Option<Arc<PathBuf>>,
}

impl ServiceState {
    /// Initializes application state from configuration and a completion service.
    pub fn from_config(
        config: &ServiceConfig,
        completion: CompletionService,
        generation: GenerationConfig,
    ) -> Result<Self> {
        config.validate()?;

        let translator = Translator::new(completion)?
            .with_language_policy(config.language_policy())
            .with_persona(config.persona()?)
            .with_generation(generation);

        Ok(Self {
            translator,
            classifier: ErrorClassifier::new(config.environment),
            static_dir: config.static_dir.clone().map(Arc::new),
        })
    }

    /// Returns the translation pipeline.
    #[inline]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Returns the error classifier.
    #[inline]
    pub fn classifier(&self) -> ErrorClassifier {
        self.classifier
    }

    /// Returns the static asset directory, if any.
    pub fn static_dir(&self) -> Option<&PathBuf> {
        self.static_dir.as_deref()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(translator: Translator);
impl_di!(classifier: ErrorClassifier);
