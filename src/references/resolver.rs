//! Reference resolution.
//!
//! Substitutes each discovered reference with the scalar it designates,
//! either from the caller's parameters or from elsewhere in the document.

use crate::core::error::{BlueprintError, BlueprintFault, BlueprintResult};
use crate::core::options::ResolveOptions;
use crate::core::predicates::is_scalar;
use crate::references::finder::{PropertyKey, ReferenceOccurrence};
use indexmap::IndexMap;
use serde_json::Value;

/// Section names that address caller-supplied parameters.
pub const PARAMETER_SECTIONS: [&str; 2] = ["parameters", "params"];

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Occurrences whose target could not be found in the document.
    pub unresolved: Vec<ReferenceOccurrence>,
    /// Hard resolution errors (missing parameters).
    pub errors: Vec<BlueprintError>,
    /// Number of occurrences substituted.
    pub resolved: usize,
}

/// Resolves reference occurrences against a blueprint.
///
/// The cache of resolved paths lives in the resolver, so every pass starts
/// from a clean slate.
pub struct ReferenceResolver<'o> {
    options: &'o ResolveOptions,
    cache: IndexMap<String, Value>,
}

impl<'o> ReferenceResolver<'o> {
    /// Create a resolver for one pass.
    pub fn new(options: &'o ResolveOptions) -> Self {
        Self {
            options,
            cache: IndexMap::new(),
        }
    }

    /// Resolve every occurrence, in order, mutating `blueprint` in place.
    ///
    /// Findings are collected; only a fault in addressing an occurrence's
    /// slot is returned as an error.
    pub fn resolve(
        mut self,
        blueprint: &mut Value,
        occurrences: Vec<ReferenceOccurrence>,
    ) -> BlueprintResult<Resolution> {
        let mut resolution = Resolution::default();

        for occurrence in occurrences {
            let path = occurrence.target_path().to_string();

            if let Some(cached) = self.cache.get(&path) {
                substitute(blueprint, &occurrence, cached.clone())?;
                resolution.resolved += 1;
                continue;
            }

            let segments: Vec<&str> = path.split('.').collect();

            if PARAMETER_SECTIONS.contains(&segments[0]) {
                let name = segments.get(1).copied().unwrap_or_default();
                match self.options.parameter(name).filter(|v| is_scalar(v)) {
                    Some(found) => {
                        let found = found.clone();
                        log::trace!("{} -> parameter '{}'", occurrence.path, name);
                        self.cache.insert(path.clone(), found.clone());
                        substitute(blueprint, &occurrence, found)?;
                        resolution.resolved += 1;
                    }
                    None => {
                        log::warn!(
                            "Reference {} at {}: parameter '{}' was not passed",
                            occurrence.reference,
                            occurrence.path,
                            name
                        );
                        resolution
                            .errors
                            .push(BlueprintError::missing_parameter(&occurrence.reference, name));
                    }
                }
                continue;
            }

            let target = lookup(blueprint, &segments).filter(|v| is_scalar(v)).cloned();
            match target {
                Some(found) => {
                    log::trace!("{} -> {}", occurrence.path, found);
                    self.cache.insert(path.clone(), found.clone());
                    substitute(blueprint, &occurrence, found)?;
                    resolution.resolved += 1;
                }
                None => {
                    log::debug!(
                        "Unresolved reference {} at {}",
                        occurrence.reference,
                        occurrence.path
                    );
                    resolution.unresolved.push(occurrence);
                }
            }
        }

        Ok(resolution)
    }
}

/// Walk a dotted path from the document root.
///
/// Mappings are entered by key; sequences by the entry whose `name` matches
/// the segment.
pub fn lookup<'v>(root: &'v Value, segments: &[&str]) -> Option<&'v Value> {
    segments.iter().try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => items
            .iter()
            .find(|item| item.get("name").and_then(Value::as_str) == Some(*segment)),
        _ => None,
    })
}

/// Write `value` into the slot the occurrence was found at.
fn substitute(
    blueprint: &mut Value,
    occurrence: &ReferenceOccurrence,
    value: Value,
) -> BlueprintResult<()> {
    let container =
        blueprint
            .pointer_mut(&occurrence.container)
            .ok_or_else(|| BlueprintFault::ContainerMissing {
                pointer: occurrence.container.clone(),
                path: occurrence.path.clone(),
            })?;

    let slot = match (&occurrence.property, container) {
        (PropertyKey::Key(key), Value::Object(map)) => map.get_mut(key),
        (PropertyKey::Index(index), Value::Array(items)) => items.get_mut(*index),
        _ => None,
    };

    match slot {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(BlueprintFault::SlotMissing {
            pointer: occurrence.container.clone(),
            property: occurrence.property.to_string(),
        }),
    }
}
