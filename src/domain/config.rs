use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::luhmann::StripRule;

/// Configuration for rebasing a note directory.
///
/// This struct holds settings that control how the source prefix is stripped
/// from old IDs and which files are scanned when rewriting references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// How many leading tokens of an old ID are replaced by the target
    /// prefix.
    strip: StripRule,

    /// Extensions (without the leading dot) of the files that are searched
    /// for references to a renamed note.
    ///
    /// For example, 'md' or 'txt'.
    reference_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip: StripRule::default(),
            reference_extensions: default_reference_extensions(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    #[cfg(test)]
    pub(crate) fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the rule used to strip the source prefix.
    #[must_use]
    pub const fn strip(&self) -> StripRule {
        self.strip
    }

    /// Sets the rule used to strip the source prefix.
    #[cfg(test)]
    pub(crate) const fn set_strip(&mut self, strip: StripRule) {
        self.strip = strip;
    }

    /// Checks if a file with the given extension is scanned for references.
    ///
    /// The comparison ignores ASCII case, so `md` also matches `NOTE.MD`.
    #[must_use]
    pub fn is_reference_extension(&self, extension: &str) -> bool {
        self.reference_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

fn default_reference_extensions() -> Vec<String> {
    vec!["md".to_string(), "txt".to_string()]
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        strip: StripRule,

        #[serde(default = "default_reference_extensions")]
        reference_extensions: Vec<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                strip,
                reference_extensions,
            } => Self {
                strip,
                reference_extensions,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            strip: config.strip,
            reference_extensions: config.reference_extensions,
        }
    }
}
