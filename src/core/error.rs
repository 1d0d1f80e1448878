//! Error types for blueprint validation and resolution.
//!
//! Two families live here:
//! - [`BlueprintError`] records are findings about the document. They are
//!   collected into lists and handed back to the caller, never raised.
//! - [`BlueprintFault`] and [`ConfigError`] are real Rust errors built with
//!   thiserror, used for internal faults and options loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed taxonomy of finding kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input was neither text nor a document tree.
    InvalidInput,
    /// Text input could not be parsed as JSON.
    JsonValidationError,
    /// `blueprintVersion` is malformed or out of range.
    InvalidVersion,
    /// A section or property has the wrong shape.
    InvalidType,
    /// A required property is absent.
    MissingRequiredProperty,
    /// A name or type does not match its format.
    InvalidFormat,
    /// A name is declared more than once in a section.
    DuplicateName,
    /// A value is outside its allowed set.
    InvalidValue,
    /// Unknown top-level property.
    InvalidProperty,
    /// A parameter reference names a parameter the caller did not pass.
    MissingParameter,
}

impl ErrorKind {
    /// Wire tag of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::JsonValidationError => "json_validation_error",
            ErrorKind::InvalidVersion => "invalid_version",
            ErrorKind::InvalidType => "invalid_type",
            ErrorKind::MissingRequiredProperty => "missing_required_property",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::InvalidValue => "invalid_value",
            ErrorKind::InvalidProperty => "invalid_property",
            ErrorKind::MissingParameter => "missing_parameter",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding about a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintError {
    /// Human-readable description.
    pub message: String,
    /// Kind tag.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

impl BlueprintError {
    /// Create a finding of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// `invalid_input` finding.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput, "Invalid input")
    }

    /// `json_validation_error` finding carrying the parser detail.
    pub fn json_validation(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::JsonValidationError,
            format!("Invalid Blueprint JSON: {}", detail),
        )
    }

    /// `invalid_version` finding.
    pub fn invalid_version(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidVersion, message)
    }

    /// `invalid_type` finding.
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidType, message)
    }

    /// `missing_required_property` finding.
    pub fn missing_property(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingRequiredProperty, message)
    }

    /// `invalid_format` finding.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFormat, message)
    }

    /// `duplicate_name` finding.
    pub fn duplicate_name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName, message)
    }

    /// `invalid_value` finding.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, message)
    }

    /// `invalid_property` finding for an unknown top-level key.
    pub fn invalid_property(property: &str) -> Self {
        Self::new(
            ErrorKind::InvalidProperty,
            format!("Found invalid Blueprint property: {}", property),
        )
    }

    /// `missing_parameter` finding for a parameter reference.
    pub fn missing_parameter(reference: &str, parameter: &str) -> Self {
        Self::new(
            ErrorKind::MissingParameter,
            format!(
                "Reference error '{}': '{}' not found in passed parameters",
                reference, parameter
            ),
        )
    }

    /// Get suggestion for fixing this finding.
    pub fn suggested_fix(&self) -> Option<String> {
        match self.kind {
            ErrorKind::InvalidVersion => {
                Some("Use a 'YYYY-MM-DD' date from 2024 onwards".to_string())
            }
            ErrorKind::DuplicateName => Some("Rename one of the entries".to_string()),
            ErrorKind::InvalidProperty => Some(
                "Move custom data under 'metadata' or remove the property".to_string(),
            ),
            ErrorKind::MissingParameter => {
                Some("Pass the parameter in the invocation options".to_string())
            }
            _ => None,
        }
    }
}

impl fmt::Display for BlueprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Unexpected internal failure. Callers should treat this as a bug.
#[derive(Error, Debug)]
pub enum BlueprintFault {
    #[error("Reference container '{pointer}' no longer exists (occurrence {path})")]
    ContainerMissing { pointer: String, path: String },

    #[error("Reference slot {property} missing in container '{pointer}'")]
    SlotMissing { pointer: String, property: String },
}

/// Errors loading invocation options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid options file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parameter '{name}' has an unsupported value: {reason}")]
    UnsupportedParameter { name: String, reason: String },

    #[error("Invalid parameter argument '{0}', expected NAME=VALUE")]
    InvalidParameterArgument(String),
}

/// Result type alias for engine operations.
pub type BlueprintResult<T> = Result<T, BlueprintFault>;

/// Result type alias for options loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ============================================================================
// Validation Report
// ============================================================================

/// Aggregated outcome of a validation pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All findings, in stage order.
    pub errors: Vec<BlueprintError>,
    /// Names of stages that reported findings.
    pub failed_stages: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the findings of one stage.
    pub fn add_stage_errors(&mut self, stage: &str, errors: Vec<BlueprintError>) {
        if errors.is_empty() {
            return;
        }
        self.failed_stages.push(stage.to_string());
        self.errors.extend(errors);
    }

    /// Whether the document passed every stage.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.is_valid() {
            "✓ Blueprint is valid".to_string()
        } else {
            format!(
                "✗ Validation failed with {} error(s) in {} stage(s)",
                self.errors.len(),
                self.failed_stages.len()
            )
        }
    }

    /// Get detailed error messages with suggestions.
    pub fn detailed_errors(&self) -> Vec<String> {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, error)| {
                let mut msg = format!("{}. {}", i + 1, error);
                if let Some(fix) = error.suggested_fix() {
                    msg.push_str(&format!("\n   → Suggestion: {}", fix));
                }
                msg
            })
            .collect()
    }

    /// Consume the report, yielding its findings.
    pub fn into_errors(self) -> Vec<BlueprintError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_wire_tag() {
        let json = serde_json::to_string(&ErrorKind::MissingRequiredProperty).unwrap();
        assert_eq!(json, "\"missing_required_property\"");
        assert_eq!(ErrorKind::JsonValidationError.as_str(), "json_validation_error");
    }

    #[test]
    fn test_error_record_serializes_type_field() {
        let error = BlueprintError::invalid_property("foo");
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["type"], "invalid_property");
        assert_eq!(value["message"], "Found invalid Blueprint property: foo");
    }

    #[test]
    fn test_missing_parameter_message() {
        let error = BlueprintError::missing_parameter("$.parameters.p", "p");
        assert_eq!(
            error.message,
            "Reference error '$.parameters.p': 'p' not found in passed parameters"
        );
        assert!(error.suggested_fix().is_some());
    }

    #[test]
    fn test_validation_report() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());

        report.add_stage_errors("Version Validation", Vec::new());
        assert!(report.is_valid());
        assert!(report.failed_stages.is_empty());

        report.add_stage_errors(
            "Version Validation",
            vec![BlueprintError::invalid_version("Invalid version: nah")],
        );
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert!(report.summary().contains("1 error"));
        assert!(report.detailed_errors()[0].contains("Suggestion"));
    }
}
