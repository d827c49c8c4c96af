//! Configuration loading and validation for the serializing pipeline.
//!
//! Settings live in a `quadcast.yaml` file. All keys are optional:
//!
//! ```yaml
//! channel_capacity: 32
//! default_base: "http://example.org/"
//! default_prefixes:
//!   ex: "http://example.org/"
//!   foaf: "http://xmlns.com/foaf/0.1/"
//! ```
//!
//! The defaults apply to any serialize call that does not bring its own
//! `prefixes` or `base`.

use crate::compact::PrefixTable;
use quadcast_graph::Term;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read the configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse the YAML configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root configuration structure for `quadcast.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Number of chunks buffered between the encoder task and the consumer.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Base IRI used when a serialize call gives none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_base: Option<String>,

    /// Prefixes used when a serialize call gives none.
    #[serde(default, skip_serializing_if = "PrefixTable::is_empty")]
    pub default_prefixes: PrefixTable,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            default_base: None,
            default_prefixes: PrefixTable::new(),
        }
    }
}

fn default_channel_capacity() -> usize {
    16
}

impl SerializerConfig {
    /// Load configuration from the default path (`./quadcast.yaml`).
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new("quadcast.yaml"))
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid, all-defaults configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: SerializerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        tracing::debug!(
            capacity = config.channel_capacity,
            prefixes = config.default_prefixes.len(),
            "Loaded serializer configuration"
        );
        Ok(config)
    }

    /// Set the channel capacity (builder pattern).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Set the default base IRI (builder pattern).
    pub fn with_default_base(mut self, base: impl Into<String>) -> Self {
        self.default_base = Some(base.into());
        self
    }

    /// Add a default prefix (builder pattern).
    pub fn with_default_prefix(
        mut self,
        label: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        self.default_prefixes.insert(label.into(), namespace.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "channel_capacity must be greater than 0".into(),
            ));
        }

        if let Some(base) = &self.default_base {
            Term::checked_iri(base).map_err(|e| {
                ConfigError::ValidationError(format!("default_base is not usable: {}", e))
            })?;
        }

        for (label, namespace) in &self.default_prefixes {
            if label.contains(':') || label.chars().any(char::is_whitespace) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid prefix label '{}'. Labels cannot contain ':' or whitespace",
                    label
                )));
            }
            Term::checked_iri(namespace).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Prefix '{}' has an unusable namespace: {}",
                    label, e
                ))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_full_config() {
        let yaml = r#"
channel_capacity: 4
default_base: "http://example.org/"
default_prefixes:
  ex: "http://example.org/"
  foaf: "http://xmlns.com/foaf/0.1/"
"#;
        let dir = tempdir().unwrap();
        let path = dir.path().join("quadcast.yaml");
        std::fs::write(&path, yaml).unwrap();

        let config = SerializerConfig::load_from_path(&path).unwrap();
        assert_eq!(config.channel_capacity, 4);
        assert_eq!(config.default_base.as_deref(), Some("http://example.org/"));

        // Order of prefixes is preserved
        let labels: Vec<&str> = config.default_prefixes.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["ex", "foaf"]);
    }

    #[test]
    fn test_load_minimal_config() {
        let config = SerializerConfig::from_yaml("default_base: \"http://a.org/\"\n").unwrap();
        assert_eq!(config.channel_capacity, 16);
        assert!(config.default_prefixes.is_empty());
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quadcast.yaml");
        std::fs::write(&path, "\n").unwrap();

        let config = SerializerConfig::load_from_path(&path).unwrap();
        assert_eq!(config, SerializerConfig::default());
    }

    #[test]
    fn test_config_not_found() {
        let result = SerializerConfig::load_from_path(Path::new("/nonexistent/quadcast.yaml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = SerializerConfig::from_yaml("channel_capacity: [not, a, number]");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_zero_capacity() {
        let result = SerializerConfig::from_yaml("channel_capacity: 0");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_empty_base() {
        let result = SerializerConfig::from_yaml("default_base: \"  \"");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_bad_prefix_label() {
        let yaml = r#"
default_prefixes:
  "ex:bad": "http://example.org/"
"#;
        let result = SerializerConfig::from_yaml(yaml);
        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("ex:bad"));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_validation_empty_namespace() {
        let config = SerializerConfig::default().with_default_prefix("ex", "");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_namespace_with_forbidden_character() {
        let config = SerializerConfig::default().with_default_prefix("ex", "http://ex.org/a b/");
        if let Err(ConfigError::ValidationError(msg)) = config.validate() {
            assert!(msg.contains("'ex'"));
            assert!(msg.contains("forbidden character"));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_validation_base_with_angle_bracket() {
        let result = SerializerConfig::from_yaml("default_base: \"http://ex.org/<x>\"");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_builders() {
        let config = SerializerConfig::default()
            .with_channel_capacity(2)
            .with_default_base("http://b.org/")
            .with_default_prefix("ex", "http://ex.org/");
        assert!(config.validate().is_ok());
        assert_eq!(config.channel_capacity, 2);
        assert_eq!(
            config.default_prefixes.get("ex").map(String::as_str),
            Some("http://ex.org/")
        );
    }

    #[test]
    fn test_roundtrip_yaml() {
        let config = SerializerConfig::default().with_default_prefix("ex", "http://ex.org/");
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("default_base"));
        assert_eq!(SerializerConfig::from_yaml(&yaml).unwrap(), config);
    }
}
