//! Blueprint document model.
//!
//! The validators work over the untyped tree, but once a document has been
//! validated it can be viewed through the typed records defined here.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;

/// Version assumed when a document omits `blueprintVersion`.
pub const FIRST_VERSION: &str = "2024-10-01";

/// Earliest accepted version year.
pub const MIN_VERSION_YEAR: u32 = 2024;

/// Top-level properties a blueprint may carry.
pub const KNOWN_PROPERTIES: [&str; 6] = [
    "blueprintVersion",
    "resources",
    "parameters",
    "outputs",
    "values",
    "metadata",
];

/// Sections searched for reference tokens, in traversal order.
pub const REFERENCEABLE_SECTIONS: [&str; 3] = ["resources", "parameters", "outputs"];

/// `YYYY-MM-DD` shape.
pub static VERSION_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Entry names.
pub static NAME_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").unwrap());

/// Namespaced resource types such as `sanity.function.document`.
pub static TYPE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*(\.[a-zA-Z0-9_-]+)+$").unwrap());

/// A parsed `YYYY-MM-DD` version. Components are not range-checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlueprintVersion {
    /// Four-digit year.
    pub year: u32,
    /// Month, nominally 1-12.
    pub month: u32,
    /// Day of month, nominally 1-31.
    pub day: u32,
}

impl BlueprintVersion {
    /// Parse a version string. Returns `None` if it is not date-shaped.
    pub fn parse(version: &str) -> Option<Self> {
        if !VERSION_FORMAT.is_match(version) {
            return None;
        }
        let mut parts = version.split('-').map(|p| p.parse::<u32>());
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(year)), Some(Ok(month)), Some(Ok(day))) => Some(Self { year, month, day }),
            _ => None,
        }
    }

    /// The version assumed for documents without one.
    pub fn first() -> Self {
        Self {
            year: 2024,
            month: 10,
            day: 1,
        }
    }
}

impl fmt::Display for BlueprintVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Default for BlueprintVersion {
    fn default() -> Self {
        Self::first()
    }
}

impl Serialize for BlueprintVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlueprintVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BlueprintVersion::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid version: {}", raw)))
    }
}

/// Supported parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Free text.
    String,
    /// Numeric value.
    Number,
    /// `true` or `false`.
    Boolean,
    /// Text that must not be echoed.
    Secret,
}

impl ParameterType {
    /// Every supported type, in declaration order.
    pub const ALL: [ParameterType; 4] = [
        ParameterType::String,
        ParameterType::Number,
        ParameterType::Boolean,
        ParameterType::Secret,
    ];

    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Secret => "secret",
        }
    }

    /// Look up a type by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// A declared resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource name.
    pub name: String,
    /// Namespaced resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Every other field of the resource.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// Unique parameter name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    /// Every other field of the declaration.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A declared output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Unique output name.
    pub name: String,
    /// Output value, possibly resolved from a reference.
    pub value: Value,
    /// Every other field of the output.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Typed view of a validated blueprint.
///
/// Absent sections are `None`, so a round trip through this type keeps the
/// distinction between "missing" and "empty".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Blueprint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// `blueprintVersion`, if present.
    pub blueprint_version: Option<BlueprintVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterDecl>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Output>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Blueprint {
    /// Build the typed view from a document tree.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Blueprint::deserialize(value)
    }

    /// Effective version, falling back to [`FIRST_VERSION`].
    pub fn version(&self) -> BlueprintVersion {
        self.blueprint_version.unwrap_or_default()
    }

    /// Find a resource by name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.as_ref()?.iter().find(|r| r.name == name)
    }

    /// Find a parameter declaration by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterDecl> {
        self.parameters.as_ref()?.iter().find(|p| p.name == name)
    }

    /// Find an output by name.
    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.as_ref()?.iter().find(|o| o.name == name)
    }
}
