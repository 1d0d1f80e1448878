//! Invocation options.

use crate::core::error::{ConfigError, ConfigResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Options for one validation/resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveOptions {
    /// Caller-supplied parameter values, keyed by declared parameter name.
    ///
    /// Kept untyped so a malformed value can be reported as a finding
    /// instead of being rejected at construction time.
    pub parameters: Option<Value>,
    /// Report discovered references through the log side channel.
    pub debug: bool,
    /// Treat a missing `blueprintVersion` as an error instead of
    /// defaulting to the first published version.
    pub strict_version: bool,
}

impl ResolveOptions {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the caller-supplied parameters.
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Add one caller-supplied parameter.
    ///
    /// If the current parameters are not a mapping they are replaced.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = match self.parameters.take() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        map.insert(name.into(), value.into());
        self.parameters = Some(Value::Object(map));
        self
    }

    /// Enable/disable the reference debug report.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable/disable strict version checking.
    pub fn with_strict_version(mut self, strict: bool) -> Self {
        self.strict_version = strict;
        self
    }

    /// Look up a caller-supplied parameter.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.as_ref()?.as_object()?.get(name)
    }

    /// Parse options from TOML text.
    ///
    /// ```toml
    /// debug = true
    /// strict_version = false
    ///
    /// [parameters]
    /// region = "eu"
    /// replicas = 3
    /// ```
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let file: OptionsFile = toml::from_str(text)?;
        let parameters = match file.parameters {
            Some(table) => {
                let mut map = Map::new();
                for (name, value) in table {
                    map.insert(name.clone(), toml_to_json(&name, value)?);
                }
                Some(Value::Object(map))
            }
            None => None,
        };
        Ok(Self {
            parameters,
            debug: file.debug,
            strict_version: file.strict_version,
        })
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Merge `NAME=VALUE` arguments into the parameters.
    ///
    /// Values that parse as JSON numbers become numbers, everything else is
    /// kept as a string.
    pub fn with_parameter_args<I, S>(mut self, args: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            let arg = arg.as_ref();
            let (name, raw) = arg
                .split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| ConfigError::InvalidParameterArgument(arg.to_string()))?;
            let value = match serde_json::from_str::<Value>(raw) {
                Ok(number @ Value::Number(_)) => number,
                _ => Value::String(raw.to_string()),
            };
            self = self.with_parameter(name, value);
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsFile {
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    strict_version: bool,
    #[serde(default)]
    parameters: Option<toml::Table>,
}

fn toml_to_json(name: &str, value: toml::Value) -> ConfigResult<Value> {
    let unsupported = |reason: &str| ConfigError::UnsupportedParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| unsupported("non-finite float"))?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| toml_to_json(name, item))
                .collect::<ConfigResult<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => {
            let mut map = Map::new();
            for (key, item) in table {
                map.insert(key, toml_to_json(name, item)?);
            }
            Value::Object(map)
        }
    })
}
