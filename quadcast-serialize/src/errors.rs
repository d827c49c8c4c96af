//! Error taxonomy for serialization.
//!
//! - [`ConfigurationError`]: bad or missing options, raised before any stream
//!   is returned.
//! - [`ServiceError`](crate::service::ServiceError): failures of the ranking or
//!   encoding collaborators, surfaced verbatim.
//! - [`SerializeError`]: what `serialize` and its output stream report.

use crate::service::ServiceError;
use thiserror::Error;

/// Options that cannot select a target content type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Missing option: one of 'contentType' or 'path' must be provided")]
    MissingOption,

    #[error("Unrecognized file extension in path '{path}'")]
    UnrecognizedPath { path: String },

    #[error("Invalid content type '{value}': expected 'type/subtype'")]
    InvalidContentType { value: String },

    #[error("No tokio runtime is running to drive the serialization")]
    NoRuntime,
}

/// Errors reported by the serializing pipeline.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// Returned synchronously by `serialize`, before any stream exists.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Delivered as the last item of an output stream.
    #[error("Encoding failed: {0}")]
    Encoding(#[source] ServiceError),
}

impl SerializeError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, SerializeError::Configuration(_))
    }

    /// Get a suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            SerializeError::Configuration(ConfigurationError::MissingOption) => Some(
                "Pass an explicit content type (e.g. 'text/turtle') or a path ending in a known extension",
            ),
            SerializeError::Configuration(ConfigurationError::UnrecognizedPath { .. }) => Some(
                "Use one of the extensions ttl, turtle, nt, ntriples, nq, nquads, n3, trig, jsonld, json, or set the content type explicitly",
            ),
            SerializeError::Configuration(ConfigurationError::InvalidContentType { .. }) => {
                Some("Content types take the form 'type/subtype', e.g. 'application/n-quads'")
            }
            SerializeError::Configuration(ConfigurationError::NoRuntime) => Some(
                "Call serialize from inside a tokio runtime, e.g. within #[tokio::main] or Runtime::block_on",
            ),
            SerializeError::Encoding(ServiceError::UnsupportedContentType(_)) => {
                Some("List the supported content types with get_content_types()")
            }
            SerializeError::Encoding(_) => None,
        }
    }

    /// Format error with suggestion for CLI output
    pub fn format_for_cli(&self) -> String {
        let mut output = format!("Error: {}", self);

        if let Some(suggestion) = self.suggestion() {
            output.push_str(&format!("\n\nSuggestion: {}", suggestion));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_option_error() {
        let error = SerializeError::from(ConfigurationError::MissingOption);
        assert!(error.is_configuration());
        assert!(error.to_string().contains("contentType"));
        assert!(error.to_string().contains("path"));
        assert!(error.suggestion().unwrap().contains("content type"));
    }

    #[test]
    fn test_unrecognized_path_names_path_verbatim() {
        let error = SerializeError::from(ConfigurationError::UnrecognizedPath {
            path: "out/Data.UNKNOWN".to_string(),
        });
        assert!(error.to_string().contains("'out/Data.UNKNOWN'"));
        assert!(error.suggestion().unwrap().contains("ttl"));
    }

    #[test]
    fn test_invalid_content_type_error() {
        let error = ConfigurationError::InvalidContentType {
            value: "turtle".to_string(),
        };
        assert!(error.to_string().contains("'turtle'"));
    }

    #[test]
    fn test_no_runtime_error() {
        let error = SerializeError::from(ConfigurationError::NoRuntime);
        assert!(error.is_configuration());
        assert!(error.to_string().contains("tokio runtime"));
        assert!(error.suggestion().unwrap().contains("tokio"));
    }

    #[test]
    fn test_encoding_error_wraps_service_error() {
        let error = SerializeError::Encoding(ServiceError::StreamFailed("boom".to_string()));
        assert!(!error.is_configuration());
        assert!(error.to_string().contains("boom"));
        assert!(error.suggestion().is_none());
    }

    #[test]
    fn test_format_for_cli() {
        let error = SerializeError::from(ConfigurationError::MissingOption);
        let formatted = error.format_for_cli();
        assert!(formatted.contains("Error:"));
        assert!(formatted.contains("Suggestion:"));

        let error = SerializeError::Encoding(ServiceError::Rejected("nope".to_string()));
        assert!(!error.format_for_cli().contains("Suggestion:"));
    }
}
