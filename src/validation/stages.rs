//! Individual validation stages.
//!
//! Each stage checks one section of the blueprint (or the caller's options)
//! and reports every problem it finds.

use crate::core::blueprint::{
    BlueprintVersion, ParameterType, FIRST_VERSION, KNOWN_PROPERTIES, MIN_VERSION_YEAR,
    NAME_FORMAT, TYPE_FORMAT,
};
use crate::core::error::BlueprintError;
use crate::core::options::ResolveOptions;
use crate::core::predicates::{is_defined, is_reference, is_scalar};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Trait for validation stages.
pub trait ValidationStage: Send + Sync {
    /// Name of this validation stage.
    fn name(&self) -> &str;

    /// Validate the blueprint.
    ///
    /// Returns Ok when the stage has nothing to report, or Err with a
    /// non-empty list of findings.
    fn validate(
        &self,
        blueprint: &Value,
        options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>>;
}

fn finish(errors: Vec<BlueprintError>) -> Result<(), Vec<BlueprintError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Render a node for a message: strings bare, everything else as JSON.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Version validation - checks `blueprintVersion`.
///
/// Verifies:
/// - The version is a `YYYY-MM-DD` string
/// - Year is 2024 or later, month and day are in range
pub struct VersionValidation;

impl ValidationStage for VersionValidation {
    fn name(&self) -> &str {
        "Version Validation"
    }

    fn validate(
        &self,
        blueprint: &Value,
        options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>> {
        let declared = blueprint.get("blueprintVersion");
        let version = match declared {
            Some(v) if is_defined(Some(v)) => v.clone(),
            _ if options.strict_version => {
                return Err(vec![BlueprintError::invalid_version(
                    "Invalid version: missing 'blueprintVersion'",
                )]);
            }
            _ => Value::String(FIRST_VERSION.to_string()),
        };

        let parsed = version.as_str().and_then(BlueprintVersion::parse);
        let Some(parsed) = parsed else {
            return Err(vec![BlueprintError::invalid_version(format!(
                "Invalid version: {}",
                display(&version)
            ))]);
        };

        // Shape is already guaranteed, so the raw components are safe to slice.
        let raw = version.as_str().unwrap_or_default();
        let mut errors = Vec::new();
        if parsed.year < MIN_VERSION_YEAR {
            errors.push(BlueprintError::invalid_version(format!(
                "Invalid version year: {}",
                &raw[0..4]
            )));
        }
        if !(1..=12).contains(&parsed.month) {
            errors.push(BlueprintError::invalid_version(format!(
                "Invalid version month: {}",
                &raw[5..7]
            )));
        }
        if !(1..=31).contains(&parsed.day) {
            errors.push(BlueprintError::invalid_version(format!(
                "Invalid version day: {}",
                &raw[8..10]
            )));
        }
        finish(errors)
    }
}

/// Labels used in messages for one list section.
struct SectionLabels {
    /// `Resources`
    section: &'static str,
    /// `Resource`
    entry: &'static str,
    /// `resource`
    lower: &'static str,
}

const RESOURCES: SectionLabels = SectionLabels {
    section: "Resources",
    entry: "Resource",
    lower: "resource",
};

const PARAMETERS: SectionLabels = SectionLabels {
    section: "Parameters",
    entry: "Parameter",
    lower: "parameter",
};

const OUTPUTS: SectionLabels = SectionLabels {
    section: "Outputs",
    entry: "Output",
    lower: "output",
};

/// Shared walk over a list section of named entries.
///
/// Checks the section is a sequence of mappings and that every `name` is
/// present, a string, unique and well-formed. `check_entry` adds the
/// section-specific rules for each mapping.
fn validate_named_list<F>(
    section: Option<&Value>,
    labels: &SectionLabels,
    mut check_entry: F,
) -> Result<(), Vec<BlueprintError>>
where
    F: FnMut(&Map<String, Value>, &mut Vec<BlueprintError>),
{
    if !is_defined(section) {
        return Ok(());
    }
    let Some(entries) = section.and_then(Value::as_array) else {
        return Err(vec![BlueprintError::invalid_type(format!(
            "{} must be an array",
            labels.section
        ))]);
    };

    let mut errors = Vec::new();
    let mut names: HashSet<&str> = HashSet::new();

    for entry in entries {
        let Some(fields) = entry.as_object() else {
            errors.push(BlueprintError::invalid_type(format!(
                "{} must be an object, found: {}",
                labels.section, entry
            )));
            continue;
        };

        match fields.get("name").filter(|name| !name.is_null()) {
            None => {
                errors.push(BlueprintError::missing_property(format!(
                    "{} must have a 'name' property",
                    labels.entry
                )));
            }
            Some(Value::String(name)) => {
                if !names.insert(name.as_str()) {
                    errors.push(BlueprintError::duplicate_name(format!(
                        "All {} 'name' properties must be unique, found: {}",
                        labels.lower, name
                    )));
                }
                if !NAME_FORMAT.is_match(name) {
                    errors.push(BlueprintError::invalid_format(format!(
                        "{} 'name' property is invalid, must conform to '{}', found: {}",
                        labels.entry,
                        NAME_FORMAT.as_str(),
                        name
                    )));
                }
            }
            Some(other) => {
                errors.push(BlueprintError::invalid_type(format!(
                    "{} 'name' property must be a string, found: {}",
                    labels.entry,
                    display(other)
                )));
            }
        }

        check_entry(fields, &mut errors);
    }

    finish(errors)
}

/// Check a `type` property is present and a string, returning it if so.
fn required_type<'a>(
    fields: &'a Map<String, Value>,
    labels: &SectionLabels,
    errors: &mut Vec<BlueprintError>,
) -> Option<&'a str> {
    match fields.get("type").filter(|t| !t.is_null()) {
        None => {
            errors.push(BlueprintError::missing_property(format!(
                "{} must have a 'type' property",
                labels.entry
            )));
            None
        }
        Some(Value::String(t)) => Some(t.as_str()),
        Some(other) => {
            errors.push(BlueprintError::invalid_type(format!(
                "{} 'type' property must be a string, found: {}",
                labels.entry,
                display(other)
            )));
            None
        }
    }
}

/// Resource validation - checks the `resources` section.
///
/// Verifies:
/// - Section is an array of objects
/// - Names are present, unique and well-formed
/// - Types are present and namespaced (e.g. `sanity.function`)
pub struct ResourcesValidation;

impl ValidationStage for ResourcesValidation {
    fn name(&self) -> &str {
        "Resources Validation"
    }

    fn validate(
        &self,
        blueprint: &Value,
        _options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>> {
        validate_named_list(blueprint.get("resources"), &RESOURCES, |fields, errors| {
            if let Some(resource_type) = required_type(fields, &RESOURCES, errors) {
                if !TYPE_FORMAT.is_match(resource_type) {
                    errors.push(BlueprintError::invalid_format(format!(
                        "Resource 'type' property is invalid, must conform to '{}', found: {}",
                        TYPE_FORMAT.as_str(),
                        resource_type
                    )));
                }
            }
        })
    }
}

/// Parameter validation - checks the `parameters` section.
///
/// Same naming rules as resources; `type` must be a supported parameter type.
pub struct ParametersValidation;

impl ValidationStage for ParametersValidation {
    fn name(&self) -> &str {
        "Parameters Validation"
    }

    fn validate(
        &self,
        blueprint: &Value,
        _options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>> {
        validate_named_list(blueprint.get("parameters"), &PARAMETERS, |fields, errors| {
            if let Some(parameter_type) = required_type(fields, &PARAMETERS, errors) {
                if ParameterType::from_name(parameter_type).is_none() {
                    errors.push(BlueprintError::invalid_value(format!(
                        "Unknown parameter 'type', found: {}",
                        parameter_type
                    )));
                }
            }
        })
    }
}

/// Output validation - checks the `outputs` section.
///
/// Same naming rules as resources; each output must carry a `value`.
pub struct OutputsValidation;

impl ValidationStage for OutputsValidation {
    fn name(&self) -> &str {
        "Outputs Validation"
    }

    fn validate(
        &self,
        blueprint: &Value,
        _options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>> {
        validate_named_list(blueprint.get("outputs"), &OUTPUTS, |fields, errors| {
            if !is_defined(fields.get("value")) {
                errors.push(BlueprintError::missing_property(
                    "Output must have a 'value' property",
                ));
            }
        })
    }
}

/// Values validation - checks the `values` section.
///
/// Every value must be a scalar, and references are not allowed here.
pub struct ValuesValidation;

impl ValidationStage for ValuesValidation {
    fn name(&self) -> &str {
        "Values Validation"
    }

    fn validate(
        &self,
        blueprint: &Value,
        _options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>> {
        let section = blueprint.get("values");
        if !is_defined(section) {
            return Ok(());
        }
        let Some(values) = section.and_then(Value::as_object) else {
            return Err(vec![BlueprintError::invalid_type("Values must be an object")]);
        };

        let mut errors = Vec::new();
        for (name, value) in values {
            if !is_scalar(value) {
                errors.push(BlueprintError::invalid_type(format!(
                    "Values property '{}' must be scalar (string or number)",
                    name
                )));
            }
            if is_reference(value) {
                errors.push(BlueprintError::invalid_type(format!(
                    "Values property '{}' cannot be a reference, found: {}",
                    name,
                    display(value)
                )));
            }
        }
        finish(errors)
    }
}

/// Metadata validation - `metadata` must be an object if present.
pub struct MetadataValidation;

impl ValidationStage for MetadataValidation {
    fn name(&self) -> &str {
        "Metadata Validation"
    }

    fn validate(
        &self,
        blueprint: &Value,
        _options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>> {
        let section = blueprint.get("metadata");
        if is_defined(section) && !section.is_some_and(Value::is_object) {
            return Err(vec![BlueprintError::invalid_type("Metadata must be an object")]);
        }
        Ok(())
    }
}

/// Property validation - rejects unknown top-level properties.
///
/// A sequence root has no named properties, so each of its indices is
/// reported instead.
pub struct PropertyValidation;

impl ValidationStage for PropertyValidation {
    fn name(&self) -> &str {
        "Property Validation"
    }

    fn validate(
        &self,
        blueprint: &Value,
        _options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>> {
        let errors = match blueprint {
            Value::Object(map) => map
                .keys()
                .filter(|key| !KNOWN_PROPERTIES.contains(&key.as_str()))
                .map(|key| BlueprintError::invalid_property(key))
                .collect(),
            Value::Array(items) => (0..items.len())
                .map(|index| BlueprintError::invalid_property(&index.to_string()))
                .collect(),
            _ => Vec::new(),
        };
        finish(errors)
    }
}

/// Passed-parameter validation - checks the caller's parameters.
///
/// Verifies:
/// - Parameters are a mapping
/// - Every value is a scalar
pub struct PassedParametersValidation;

impl ValidationStage for PassedParametersValidation {
    fn name(&self) -> &str {
        "Passed Parameters Validation"
    }

    fn validate(
        &self,
        _blueprint: &Value,
        options: &ResolveOptions,
    ) -> Result<(), Vec<BlueprintError>> {
        let passed = options.parameters.as_ref();
        if !is_defined(passed) {
            return Ok(());
        }
        let Some(parameters) = passed.and_then(Value::as_object) else {
            return Err(vec![BlueprintError::invalid_type(
                "Passed parameters must be an object",
            )]);
        };

        let errors = parameters
            .iter()
            .filter(|(_, value)| !is_scalar(value))
            .map(|(name, _)| {
                BlueprintError::invalid_type(format!(
                    "Passed parameter '{}' must be scalar (string or number)",
                    name
                ))
            })
            .collect();
        finish(errors)
    }
}
