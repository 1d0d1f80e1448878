//! Reference discovery.
//!
//! Walks the referenceable sections of a blueprint depth-first, in document
//! order, and records every reference token it meets.

use crate::core::blueprint::REFERENCEABLE_SECTIONS;
use crate::core::options::ResolveOptions;
use crate::core::predicates::is_reference;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Where a token sits inside its container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyKey {
    /// Key of a mapping.
    Key(String),
    /// Index of a sequence.
    Index(usize),
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Key(key) => f.write_str(key),
            PropertyKey::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// One appearance of a reference token in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOccurrence {
    /// Human-readable location, e.g. `resources.my-fn.env[1]`.
    pub path: String,
    /// Key or index of the token inside its container.
    pub property: PropertyKey,
    /// The token itself.
    #[serde(rename = "ref")]
    pub reference: String,
    /// JSON pointer to the mapping or sequence holding the token.
    pub container: String,
}

impl ReferenceOccurrence {
    /// The token with its root sigil stripped.
    pub fn target_path(&self) -> &str {
        self.reference
            .strip_prefix(crate::core::predicates::ROOT_SIGIL)
            .unwrap_or(&self.reference)
    }
}

/// Depth-first reference finder.
#[derive(Debug, Default)]
pub struct ReferenceFinder {
    found: Vec<ReferenceOccurrence>,
}

impl ReferenceFinder {
    /// Create an empty finder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find every reference in `resources`, `parameters` and `outputs`.
    pub fn find(blueprint: &Value, options: &ResolveOptions) -> Vec<ReferenceOccurrence> {
        let mut finder = Self::new();

        for section in REFERENCEABLE_SECTIONS {
            let Some(entries) = blueprint.get(section).and_then(Value::as_array) else {
                continue;
            };
            for (index, entry) in entries.iter().enumerate() {
                let top = match entry.get("name") {
                    Some(Value::String(name)) => format!("{}.{}", section, name),
                    _ => format!("{}[{}]", section, index),
                };
                let pointer = format!("/{}/{}", section, index);
                finder.walk(entry, &top, &pointer);
            }
        }

        if options.debug {
            log::info!(
                target: "blueprint::refs",
                "Found {} references: {:?}",
                finder.found.len(),
                finder.found
            );
        } else {
            log::trace!("Found {} references", finder.found.len());
        }

        finder.found
    }

    fn walk(&mut self, node: &Value, path: &str, pointer: &str) {
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    let current = format!("{}.{}", path, key);
                    if is_reference(value) {
                        self.record(current, PropertyKey::Key(key.clone()), value, pointer);
                    } else if value.is_object() || value.is_array() {
                        let child = format!("{}/{}", pointer, escape_pointer(key));
                        self.walk(value, &current, &child);
                    }
                }
            }
            Value::Array(items) => {
                for (index, value) in items.iter().enumerate() {
                    let current = format!("{}[{}]", path, index);
                    if is_reference(value) {
                        self.record(current, PropertyKey::Index(index), value, pointer);
                    } else if value.is_object() {
                        let child = format!("{}/{}", pointer, index);
                        self.walk(value, &current, &child);
                    }
                }
            }
            _ => {}
        }
    }

    fn record(&mut self, path: String, property: PropertyKey, token: &Value, pointer: &str) {
        let reference = token.as_str().unwrap_or_default().to_string();
        log::trace!("Reference at {}: {}", path, reference);
        self.found.push(ReferenceOccurrence {
            path,
            property,
            reference,
            container: pointer.to_string(),
        });
    }
}

/// Escape a mapping key for use in a JSON pointer (RFC 6901).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
