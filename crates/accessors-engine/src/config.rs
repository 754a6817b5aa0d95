//! Engine configuration
//!
//! Settings can be given in code or loaded from the `[accessors]` table of
//! a TOML file:
//!
//! ```toml
//! [accessors]
//! placeholder = "%property%"
//! duplicate_overrides = "reject"   # or "last-wins"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Parsed but not usable
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// What to do when two override methods claim the same operation on the
/// same property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateOverrides {
    /// Fail class resolution
    #[default]
    Reject,
    /// Keep the last-declared method and log a warning
    LastWins,
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorsConfig {
    /// Token in mutator references replaced by the property name
    pub placeholder: String,

    /// Handling of ambiguous override methods
    pub duplicate_overrides: DuplicateOverrides,
}

fn default_placeholder() -> String {
    "%property%".to_string()
}

impl Default for AccessorsConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            duplicate_overrides: DuplicateOverrides::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    accessors: Option<AccessorsConfig>,
}

impl AccessorsConfig {
    /// Parse from TOML content; a missing `[accessors]` table gives defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let config = file.accessors.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placeholder.is_empty() {
            return Err(ConfigError::ValidationError(
                "placeholder must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AccessorsConfig::default();
        assert_eq!(config.placeholder, "%property%");
        assert_eq!(config.duplicate_overrides, DuplicateOverrides::Reject);
    }

    #[test]
    fn test_missing_table_gives_defaults() {
        let config = AccessorsConfig::from_toml_str("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, AccessorsConfig::default());
    }

    #[test]
    fn test_parse_table() {
        let toml = r#"
[accessors]
placeholder = "{prop}"
duplicate_overrides = "last-wins"
"#;
        let config = AccessorsConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.placeholder, "{prop}");
        assert_eq!(config.duplicate_overrides, DuplicateOverrides::LastWins);
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let config = AccessorsConfig::from_toml_str("[accessors]\nduplicate_overrides = \"reject\"\n").unwrap();
        assert_eq!(config.placeholder, "%property%");
    }

    #[test]
    fn test_rejects_empty_placeholder() {
        let err = AccessorsConfig::from_toml_str("[accessors]\nplaceholder = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = AccessorsConfig::from_toml_str("[accessors]\nduplicate_overrides = \"first\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[accessors]\nplaceholder = \"@name@\"").unwrap();

        let config = AccessorsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.placeholder, "@name@");

        let missing = AccessorsConfig::from_file(Path::new("/nonexistent/accessors.toml"));
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }
}
