//! Shape predicates over untyped document nodes.
//!
//! Pure classification helpers used by every validation stage and by the
//! reference finder/resolver.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Syntax of a reference token: `$.` followed by a dot-delimited path.
pub static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\.[^.\s]+(\.[^.\s]+)*$").unwrap());

/// Prefix meaning "resolve from the document root".
pub const ROOT_SIGIL: &str = "$.";

/// Is this node a string?
pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Is this node a plain mapping (not a sequence, not null)?
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// Is this node a sequence?
pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// Is this optional node present and non-null?
pub fn is_defined(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

/// Scalars are strings and numbers. Booleans and null are not.
pub fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_))
}

/// Is this node a reference token?
pub fn is_reference(value: &Value) -> bool {
    value.as_str().is_some_and(is_reference_str)
}

/// Does this string use the reference syntax?
pub fn is_reference_str(token: &str) -> bool {
    REFERENCE_RE.is_match(token)
}
