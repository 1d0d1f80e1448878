//! Blueprint engine.
//!
//! Sequences parse → validate → find → resolve, stopping at the first stage
//! that reports errors.

use crate::core::error::{BlueprintResult, ValidationReport};
use crate::core::input::{BlueprintInput, Parsed};
use crate::core::options::ResolveOptions;
use crate::execution::outcome::{non_empty, ResolveOutcome, ResolveStats};
use crate::references::finder::ReferenceFinder;
use crate::references::resolver::ReferenceResolver;
use crate::validation::pipeline::ValidationPipeline;
use serde_json::Value;

/// Runs validation and reference resolution over blueprints.
///
/// The engine holds no per-document state; one engine can serve any number
/// of independent passes.
pub struct BlueprintEngine {
    pipeline: ValidationPipeline,
}

impl BlueprintEngine {
    /// Create an engine with the default validation pipeline.
    pub fn new() -> Self {
        Self {
            pipeline: ValidationPipeline::default_pipeline(),
        }
    }

    /// Create an engine with a custom validation pipeline.
    pub fn with_pipeline(pipeline: ValidationPipeline) -> Self {
        Self { pipeline }
    }

    /// Run structural validation only.
    pub fn validate(&self, blueprint: &Value, options: &ResolveOptions) -> ValidationReport {
        self.pipeline.validate(blueprint, options)
    }

    /// Validate a blueprint and resolve its references.
    ///
    /// Findings come back inside the outcome. `Err` means an internal fault.
    pub fn validate_and_resolve(
        &self,
        input: impl Into<BlueprintInput>,
        options: &ResolveOptions,
    ) -> BlueprintResult<ResolveOutcome> {
        let input = input.into();
        let mut blueprint = match input.parse() {
            Parsed::Document(document) => document,
            Parsed::Failed { blueprint, errors } => {
                return Ok(ResolveOutcome::failed(blueprint, errors));
            }
        };

        let report = self.validate(&blueprint, options);
        if !report.is_valid() {
            log::debug!("{}", report.summary());
            return Ok(ResolveOutcome::failed(blueprint, report.into_errors()));
        }

        let found = ReferenceFinder::find(&blueprint, options);
        if found.is_empty() {
            return Ok(ResolveOutcome::ok(blueprint));
        }
        let references_found = found.len();

        let resolution = ReferenceResolver::new(options).resolve(&mut blueprint, found)?;
        log::debug!(
            "Resolved {}/{} references ({} unresolved, {} error(s))",
            resolution.resolved,
            references_found,
            resolution.unresolved.len(),
            resolution.errors.len()
        );

        Ok(ResolveOutcome {
            blueprint,
            errors: non_empty(resolution.errors),
            unresolved_refs: non_empty(resolution.unresolved),
            stats: ResolveStats {
                references_found,
                resolved: resolution.resolved,
            },
        })
    }
}

impl Default for BlueprintEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::references::finder::PropertyKey;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn run(input: impl Into<BlueprintInput>, options: &ResolveOptions) -> ResolveOutcome {
        BlueprintEngine::new()
            .validate_and_resolve(input, options)
            .unwrap()
    }

    fn round_trip_doc() -> Value {
        json!({
            "resources": [{"name": "a", "type": "x.y", "value": "$.parameters.p"}],
            "parameters": [{"name": "p", "type": "string"}],
        })
    }

    #[test]
    fn test_basic_inputs() {
        let input = json!({"blueprintVersion": "2024-10-01"});
        let text = input.to_string();

        for outcome in [
            run(input.clone(), &ResolveOptions::default()),
            run(text.as_str(), &ResolveOptions::default()),
            run(text.clone().into_bytes(), &ResolveOptions::default()),
            run(input.clone(), &ResolveOptions::new().with_parameter("ok", "hello")),
        ] {
            assert_eq!(outcome.blueprint, input);
            assert!(outcome.errors.is_none());
            assert!(outcome.unresolved_refs.is_none());
        }
    }

    #[test]
    fn test_basic_input_errors() {
        let outcome = run("{", &ResolveOptions::default());
        assert_eq!(outcome.blueprint, json!("{"));
        assert_eq!(outcome.errors.as_ref().unwrap().len(), 1);
        assert!(outcome.has_error_kind(ErrorKind::JsonValidationError));

        let outcome = run(Value::Null, &ResolveOptions::default());
        assert_eq!(outcome.blueprint, Value::Null);
        assert!(outcome.has_error_kind(ErrorKind::InvalidInput));

        let bad_version = json!({"blueprintVersion": "nah"});
        let outcome = run(bad_version.clone(), &ResolveOptions::default());
        assert_eq!(outcome.blueprint, bad_version);
        assert_eq!(outcome.errors.unwrap().len(), 1);

        let outcome = run(json!({}), &ResolveOptions::new().with_parameters(json!("hi")));
        assert_eq!(outcome.blueprint, json!({}));
        assert_eq!(outcome.errors.unwrap().len(), 1);

        let outcome = run(json!({}), &ResolveOptions::new().with_parameters(json!({"ok": {}})));
        assert_eq!(outcome.errors.unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_input_envelope_shape() {
        let outcome = run(json!(12), &ResolveOptions::default());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"blueprint": 12, "errors": [{"message": "Invalid input", "type": "invalid_input"}]})
        );
    }

    #[test]
    fn test_round_trip_parameter_resolution() {
        let options = ResolveOptions::new().with_parameter("p", "hello");
        let outcome = run(round_trip_doc(), &options);
        assert_eq!(outcome.blueprint["resources"][0]["value"], "hello");
        assert!(outcome.is_clean());
        assert_eq!(outcome.stats, ResolveStats { references_found: 1, resolved: 1 });
        assert_eq!(
            outcome.typed().unwrap().resource("a").unwrap().fields["value"],
            "hello"
        );
    }

    #[test]
    fn test_missing_parameter_scenario() {
        let options = ResolveOptions::new().with_parameters(json!({}));
        let outcome = run(round_trip_doc(), &options);
        assert_eq!(outcome.blueprint["resources"][0]["value"], "$.parameters.p");
        assert!(outcome.unresolved_refs.is_none());
        let errors = outcome.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::MissingParameter);
    }

    #[test]
    fn test_missing_document_target_scenario() {
        let outcome = run(
            json!({"outputs": [{"name": "o", "value": "$.resources.missing.value"}]}),
            &ResolveOptions::default(),
        );
        assert!(outcome.errors.is_none());
        let unresolved = outcome.unresolved_refs.unwrap();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].reference, "$.resources.missing.value");
        assert_eq!(unresolved[0].property, PropertyKey::Key("value".to_string()));
    }

    #[test]
    fn test_validation_failure_skips_resolution() {
        let doc = json!({
            "resources": [{"name": "a", "type": "x.y", "value": "$.parameters.p"}],
            "bogus": true,
        });
        let options = ResolveOptions::new().with_parameter("p", "hello");
        let outcome = run(doc.clone(), &options);
        assert_eq!(outcome.blueprint, doc);
        assert!(outcome.has_error_kind(ErrorKind::InvalidProperty));
        assert!(outcome.unresolved_refs.is_none());
    }

    #[test]
    fn test_strict_version() {
        let options = ResolveOptions::new().with_strict_version(true);
        let outcome = run(json!({}), &options);
        assert!(outcome.has_error_kind(ErrorKind::InvalidVersion));
    }

    #[test]
    fn test_mixed_resolution() {
        let doc = json!({
            "blueprintVersion": "2024-10-01",
            "values": {"region": "eu"},
            "resources": [{
                "name": "fn",
                "type": "sanity.function.document",
                "env": {"REGION": "$.values.region", "TOKEN": "$.parameters.token"},
                "args": ["$.params.level", "--verbose", "$.params.level"],
            }],
            "parameters": [
                {"name": "token", "type": "secret"},
                {"name": "level", "type": "number"},
            ],
            "outputs": [
                {"name": "region", "value": "$.resources.fn.env.REGION"},
                {"name": "ghost", "value": "$.resources.nope.env"},
            ],
        });
        let options = ResolveOptions::new().with_parameter("level", 3);
        let outcome = run(doc, &options);

        assert_eq!(outcome.blueprint["resources"][0]["env"]["REGION"], "eu");
        assert_eq!(outcome.blueprint["resources"][0]["env"]["TOKEN"], "$.parameters.token");
        assert_eq!(outcome.blueprint["resources"][0]["args"], json!([3, "--verbose", 3]));
        assert_eq!(outcome.blueprint["outputs"][0]["value"], "eu");

        let errors = outcome.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Reference error '$.parameters.token': 'token' not found in passed parameters"
        );
        let unresolved = outcome.unresolved_refs.unwrap();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].path, "outputs.ghost.value");
    }

    #[test]
    fn test_caller_tree_is_not_mutated() {
        let doc = round_trip_doc();
        let options = ResolveOptions::new().with_parameter("p", "hello");
        let outcome = BlueprintEngine::new()
            .validate_and_resolve(&doc, &options)
            .unwrap();
        assert_eq!(doc["resources"][0]["value"], "$.parameters.p");
        assert_eq!(outcome.blueprint["resources"][0]["value"], "hello");
    }

    fn reference_free_document() -> impl Strategy<Value = Value> {
        let entry = ("[a-z][a-z0-9]{0,6}", "[a-z]{1,4}\\.[a-z]{1,4}", "[a-zA-Z0-9 ]{0,8}");
        prop::collection::vec(entry, 0..6).prop_map(|entries| {
            let mut seen = std::collections::HashSet::new();
            let resources: Vec<Value> = entries
                .into_iter()
                .filter(|(name, _, _)| seen.insert(name.clone()))
                .map(|(name, kind, note)| json!({"name": name, "type": kind, "note": note}))
                .collect();
            json!({"blueprintVersion": "2024-10-01", "resources": resources})
        })
    }

    proptest! {
        #[test]
        fn prop_reference_free_documents_are_unchanged(doc in reference_free_document()) {
            let outcome = run(doc.clone(), &ResolveOptions::default());
            prop_assert_eq!(&outcome.blueprint, &doc);
            prop_assert!(outcome.errors.is_none());
            prop_assert!(outcome.unresolved_refs.is_none());
        }

        #[test]
        fn prop_one_duplicate_error_per_repeat(name in "[a-z][a-z0-9]{0,6}", copies in 1usize..6) {
            let resources: Vec<Value> = (0..copies)
                .map(|_| json!({"name": name, "type": "x.y"}))
                .collect();
            let outcome = run(json!({"resources": resources}), &ResolveOptions::default());
            let duplicates = outcome
                .errors
                .unwrap_or_default()
                .iter()
                .filter(|e| e.kind == ErrorKind::DuplicateName)
                .count();
            prop_assert_eq!(duplicates, copies - 1);
        }
    }
}
