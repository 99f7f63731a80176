//! Configuration system
//!
//! Any serde type with a `Default` can be loaded from and saved to TOML or RON
//! files by implementing [`Config`]. Types override [`Config::validate`] to
//! reject values that would otherwise surface later as runtime faults.

pub use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (`.toml`)
    Toml,
    /// Rusty Object Notation (`.ron`)
    Ron,
}

impl ConfigFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Check semantic constraints after parsing
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Parse and validate configuration text in the given format
    fn from_str_with(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: Self = match format {
            ConfigFormat::Toml => {
                toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            ConfigFormat::Ron => {
                ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize to text in the given format
    fn to_string_with(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with(&contents, format)
    }

    /// Load configuration from file, falling back to defaults on any failure
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default configuration ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_string_with(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Parsed but semantically invalid
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field path
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Tuning {
        speed: f32,
        name: String,
    }

    impl Default for Tuning {
        fn default() -> Self {
            Self { speed: 4.0, name: "walk".to_string() }
        }
    }

    impl Config for Tuning {
        fn validate(&self) -> Result<(), ConfigError> {
            if self.speed <= 0.0 {
                return Err(ConfigError::Invalid {
                    field: "speed",
                    reason: "must be positive".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("level.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("level.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let tuning = Tuning::from_str_with("speed = 6.5", ConfigFormat::Toml).unwrap();
        assert_eq!(tuning.speed, 6.5);
        assert_eq!(tuning.name, "walk");
    }

    #[test]
    fn test_ron_roundtrip_through_text() {
        let original = Tuning { speed: 2.0, name: "sneak".to_string() };
        let text = original.to_string_with(ConfigFormat::Ron).unwrap();
        let parsed = Tuning::from_str_with(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let result = Tuning::from_str_with("speed = -1.0", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Invalid { field: "speed", .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let tuning = Tuning::load_or_default("definitely/not/here.toml");
        assert_eq!(tuning, Tuning::default());
    }
}
