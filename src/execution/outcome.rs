//! Result envelope of a validation/resolution pass.

use crate::core::blueprint::Blueprint;
use crate::core::error::{BlueprintError, ErrorKind};
use crate::references::finder::ReferenceOccurrence;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Counters for one pass. Not part of the serialized envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Reference occurrences discovered.
    pub references_found: usize,
    /// Occurrences substituted.
    pub resolved: usize,
}

/// What the caller gets back.
///
/// `blueprint` is always present: the original input, the parsed-but-invalid
/// document, or the (partially) resolved document. Optional fields are
/// omitted rather than empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOutcome {
    /// The returned document.
    pub blueprint: Value,
    /// Parse, validation or resolution errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<BlueprintError>>,
    /// References whose target is not in the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved_refs: Option<Vec<ReferenceOccurrence>>,
    /// Pass counters.
    #[serde(skip)]
    pub stats: ResolveStats,
}

impl ResolveOutcome {
    /// A clean outcome with no findings.
    pub fn ok(blueprint: Value) -> Self {
        Self {
            blueprint,
            errors: None,
            unresolved_refs: None,
            stats: ResolveStats::default(),
        }
    }

    /// An outcome carrying findings. An empty list is dropped.
    pub fn failed(blueprint: Value, errors: Vec<BlueprintError>) -> Self {
        Self {
            errors: non_empty(errors),
            ..Self::ok(blueprint)
        }
    }

    /// No errors and no unresolved references.
    pub fn is_clean(&self) -> bool {
        self.errors.is_none() && self.unresolved_refs.is_none()
    }

    /// Whether any error was reported.
    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }

    /// Does any error have the given kind?
    pub fn has_error_kind(&self, kind: ErrorKind) -> bool {
        self.errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.kind == kind))
    }

    /// Typed view of the returned blueprint.
    pub fn typed(&self) -> Result<Blueprint, serde_json::Error> {
        Blueprint::from_value(&self.blueprint)
    }

    /// Serialize the envelope to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize the envelope to compact JSON.
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub(crate) fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_omitted() {
        let outcome = ResolveOutcome::ok(json!({"blueprintVersion": "2024-10-01"}));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({"blueprint": {"blueprintVersion": "2024-10-01"}}));
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = ResolveOutcome::failed(json!(null), vec![BlueprintError::invalid_input()]);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({"blueprint": null, "errors": [{"message": "Invalid input", "type": "invalid_input"}]})
        );
        assert!(outcome.has_error_kind(ErrorKind::InvalidInput));
        assert!(!outcome.has_error_kind(ErrorKind::InvalidType));

        let empty = ResolveOutcome::failed(json!({}), Vec::new());
        assert!(empty.errors.is_none());
    }

    #[test]
    fn test_unresolved_refs_key_is_camel_case() {
        let mut outcome = ResolveOutcome::ok(json!({}));
        outcome.unresolved_refs = Some(Vec::new());
        let json = outcome.to_json_compact().unwrap();
        assert!(json.contains("\"unresolvedRefs\""));
    }
}
