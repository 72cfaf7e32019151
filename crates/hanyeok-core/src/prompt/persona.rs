#[cfg(feature = "config")]
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Built-in persona selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PersonaPreset {
    /// No persona.
    #[default]
    None,
    /// Manufacturing engineer terminology.
    Manufacturing,
    /// Instructions supplied by configuration.
    Custom,
}

/// Domain expertise framing prepended to every prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    name: String,
    instructions: String,
}

impl Persona {
    /// Creates a persona from a name and its instructions.
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
        }
    }

    /// Senior manufacturing engineer persona.
    pub fn manufacturing_engineer() -> Self {
        Self::new(
            "manufacturing",
            "Act as a senior manufacturing engineer with long experience on production \
             lines, in quality control and in equipment maintenance. Prefer the standard \
             shop-floor and engineering terminology of each language, and keep part numbers, \
             model names and units exactly as written.",
        )
    }

    /// Resolves a preset, using `instructions` for [`PersonaPreset::Custom`].
    ///
    /// Returns `None` for [`PersonaPreset::None`] and for a custom preset
    /// without instructions.
    pub fn from_preset(preset: PersonaPreset, instructions: Option<&str>) -> Option<Self> {
        match preset {
            PersonaPreset::None => None,
            PersonaPreset::Manufacturing => Some(Self::manufacturing_engineer()),
            PersonaPreset::Custom => instructions
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(|text| Self::new("custom", text)),
        }
    }

    /// Returns the persona name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the persona instructions.
    #[inline]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_presets() {
        assert!(Persona::from_preset(PersonaPreset::None, Some("ignored")).is_none());
        assert_eq!(
            Persona::from_preset(PersonaPreset::Manufacturing, None),
            Some(Persona::manufacturing_engineer())
        );

        let custom = Persona::from_preset(PersonaPreset::Custom, Some(" Legal expert. ")).unwrap();
        assert_eq!(custom.instructions(), "Legal expert.");
        assert!(Persona::from_preset(PersonaPreset::Custom, Some("  ")).is_none());
    }
}
