//! Service-level configuration.

use std::path::{Path, PathBuf};

#[cfg(feature = "config")]
use clap::Args;
use hanyeok_core::prompt::{Persona, PersonaPreset};
use hanyeok_core::request::LanguagePolicy;
use hanyeok_core::{Environment, Error, Result};
use serde::{Deserialize, Serialize};

/// App configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Deployment environment; development exposes diagnostic details in errors.
    #[cfg_attr(
        feature = "config",
        arg(long = "app-env", env = "APP_ENV", value_enum, default_value = "development")
    )]
    #[serde(default)]
    pub environment: Environment,

    /// Accept any plain target language name instead of Japanese, Chinese and English only.
    #[cfg_attr(feature = "config", arg(long, env = "OPEN_TARGET_LANGUAGES"))]
    #[serde(default)]
    pub open_target_languages: bool,

    /// Persona prepended to every prompt.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "PERSONA", value_enum, default_value = "none")
    )]
    #[serde(default)]
    pub persona: PersonaPreset,

    /// Instructions of the `custom` persona.
    #[cfg_attr(feature = "config", arg(long, env = "PERSONA_INSTRUCTIONS"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_instructions: Option<String>,

    /// Directory served for non-API paths, with `index.html` as fallback.
    #[cfg_attr(feature = "config", arg(long, env = "STATIC_DIR"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl ServiceConfig {
    /// Returns the target language policy.
    pub fn language_policy(&self) -> LanguagePolicy {
        if self.open_target_languages {
            LanguagePolicy::Open
        } else {
            LanguagePolicy::Closed
        }
    }

    /// Resolves the configured persona.
    ///
    /// A `custom` preset without instructions is a configuration error.
    pub fn persona(&self) -> Result<Option<Persona>> {
        let persona = Persona::from_preset(self.persona, self.persona_instructions.as_deref());
        if self.persona == PersonaPreset::Custom && persona.is_none() {
            return Err(Error::configuration(
                "PERSONA_INSTRUCTIONS must be set when PERSONA is custom",
            ));
        }

        Ok(persona)
    }

    /// Returns the static asset directory, if any.
    pub fn static_dir(&self) -> Option<&Path> {
        self.static_dir.as_deref()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.persona()?;

        if let Some(dir) = self.static_dir()
            && !dir.is_dir()
        {
            return Err(Error::configuration(format!(
                "STATIC_DIR '{}' is not a directory",
                dir.display()
            )));
        }

        Ok(())
    }

    /// Sets the environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the static asset directory.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}
