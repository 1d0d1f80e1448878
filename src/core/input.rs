//! Blueprint input and the parse step.

use crate::core::error::BlueprintError;
use serde_json::Value;

/// Raw input accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum BlueprintInput {
    /// JSON text.
    Text(String),
    /// JSON bytes, e.g. straight from a file.
    Bytes(Vec<u8>),
    /// An already-parsed document tree.
    Tree(Value),
}

/// Outcome of parsing an input.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// An owned document tree, independent of the caller's input.
    Document(Value),
    /// Parsing failed; `blueprint` is what gets handed back to the caller.
    Failed {
        blueprint: Value,
        errors: Vec<BlueprintError>,
    },
}

impl BlueprintInput {
    /// The input as a tree for returning alongside parse errors.
    pub fn to_value(&self) -> Value {
        match self {
            BlueprintInput::Text(text) => Value::String(text.clone()),
            BlueprintInput::Bytes(bytes) => {
                Value::String(String::from_utf8_lossy(bytes).into_owned())
            }
            BlueprintInput::Tree(tree) => tree.clone(),
        }
    }

    /// Parse the input into an owned document tree.
    ///
    /// Text and bytes go through `serde_json`; trees are deep-copied. Only
    /// mappings and sequences are documents, anything else is `invalid_input`.
    pub fn parse(&self) -> Parsed {
        let tree = match self {
            BlueprintInput::Text(text) => serde_json::from_str::<Value>(text),
            BlueprintInput::Bytes(bytes) => serde_json::from_slice::<Value>(bytes),
            BlueprintInput::Tree(tree) => Ok(tree.clone()),
        };

        match tree {
            Ok(document @ (Value::Object(_) | Value::Array(_))) => Parsed::Document(document),
            Ok(other) => {
                log::debug!("Rejecting non-document input: {}", kind_name(&other));
                let blueprint = match self {
                    BlueprintInput::Tree(_) => other,
                    _ => self.to_value(),
                };
                Parsed::Failed {
                    blueprint,
                    errors: vec![BlueprintError::invalid_input()],
                }
            }
            Err(error) => {
                log::debug!("Blueprint JSON failed to parse: {}", error);
                Parsed::Failed {
                    blueprint: self.to_value(),
                    errors: vec![BlueprintError::json_validation(error)],
                }
            }
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<&str> for BlueprintInput {
    fn from(text: &str) -> Self {
        BlueprintInput::Text(text.to_string())
    }
}

impl From<String> for BlueprintInput {
    fn from(text: String) -> Self {
        BlueprintInput::Text(text)
    }
}

impl From<Vec<u8>> for BlueprintInput {
    fn from(bytes: Vec<u8>) -> Self {
        BlueprintInput::Bytes(bytes)
    }
}

impl From<&[u8]> for BlueprintInput {
    fn from(bytes: &[u8]) -> Self {
        BlueprintInput::Bytes(bytes.to_vec())
    }
}

impl From<Value> for BlueprintInput {
    fn from(tree: Value) -> Self {
        BlueprintInput::Tree(tree)
    }
}

impl From<&Value> for BlueprintInput {
    fn from(tree: &Value) -> Self {
        BlueprintInput::Tree(tree.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_parse_text_and_bytes() {
        let text = r#"{"blueprintVersion":"2024-10-01"}"#;
        let expected = json!({"blueprintVersion": "2024-10-01"});
        assert_eq!(BlueprintInput::from(text).parse(), Parsed::Document(expected.clone()));
        assert_eq!(
            BlueprintInput::from(text.as_bytes()).parse(),
            Parsed::Document(expected)
        );
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let parsed = BlueprintInput::from(r#"{"z":1,"a":2,"m":3}"#).parse();
        let Parsed::Document(Value::Object(map)) = parsed else {
            panic!("expected a document");
        };
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_invalid_json_returns_original_text() {
        match BlueprintInput::from("{").parse() {
            Parsed::Failed { blueprint, errors } => {
                assert_eq!(blueprint, json!("{"));
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, ErrorKind::JsonValidationError);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_non_document_tree_is_invalid_input() {
        for value in [Value::Null, json!(5), json!(true), json!("text")] {
            match BlueprintInput::Tree(value.clone()).parse() {
                Parsed::Failed { blueprint, errors } => {
                    assert_eq!(blueprint, value);
                    assert_eq!(errors[0].kind, ErrorKind::InvalidInput);
                }
                other => panic!("unexpected: {:?}", other),
            }
        }
    }

    #[test]
    fn test_scalar_json_text_is_invalid_input() {
        match BlueprintInput::from("42").parse() {
            Parsed::Failed { blueprint, errors } => {
                assert_eq!(blueprint, json!("42"));
                assert_eq!(errors[0].kind, ErrorKind::InvalidInput);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_tree_is_copied() {
        let original = json!({"metadata": {"a": 1}});
        let input = BlueprintInput::from(&original);
        let Parsed::Document(mut copy) = input.parse() else {
            panic!("expected a document");
        };
        copy["metadata"]["a"] = json!(2);
        assert_eq!(original["metadata"]["a"], 1);
    }
}
