//! Validation pipeline implementation.

use crate::core::error::ValidationReport;
use crate::core::options::ResolveOptions;
use crate::validation::stages::{
    MetadataValidation, OutputsValidation, ParametersValidation, PassedParametersValidation,
    PropertyValidation, ResourcesValidation, ValidationStage, ValuesValidation,
    VersionValidation,
};
use serde_json::Value;

/// Multi-stage validation pipeline.
///
/// Every stage runs independently and all findings are aggregated, so a
/// single pass reports everything wrong with a document.
pub struct ValidationPipeline {
    stages: Vec<Box<dyn ValidationStage>>,
}

impl ValidationPipeline {
    /// Create a new pipeline with the given stages.
    pub fn new(stages: Vec<Box<dyn ValidationStage>>) -> Self {
        Self { stages }
    }

    /// Create the default validation pipeline with all standard stages.
    pub fn default_pipeline() -> Self {
        Self {
            stages: vec![
                Box::new(VersionValidation),
                Box::new(ResourcesValidation),
                Box::new(ValuesValidation),
                Box::new(ParametersValidation),
                Box::new(OutputsValidation),
                Box::new(MetadataValidation),
                Box::new(PropertyValidation),
                Box::new(PassedParametersValidation),
            ],
        }
    }

    /// Add a custom validation stage.
    pub fn add_stage(&mut self, stage: Box<dyn ValidationStage>) {
        self.stages.push(stage);
    }

    /// Names of the configured stages, in run order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Validate a blueprint through all stages.
    pub fn validate(&self, blueprint: &Value, options: &ResolveOptions) -> ValidationReport {
        let mut report = ValidationReport::new();

        for stage in &self.stages {
            match stage.validate(blueprint, options) {
                Ok(()) => log::trace!("{}: ok", stage.name()),
                Err(errors) => {
                    log::debug!("{}: {} error(s)", stage.name(), errors.len());
                    report.add_stage_errors(stage.name(), errors);
                }
            }
        }

        report
    }

    /// Quick check - does the blueprint pass every stage?
    pub fn is_valid(&self, blueprint: &Value, options: &ResolveOptions) -> bool {
        self.validate(blueprint, options).is_valid()
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{BlueprintError, ErrorKind};
    use serde_json::json;

    #[test]
    fn test_empty_blueprint_is_valid() {
        let pipeline = ValidationPipeline::default_pipeline();
        let report = pipeline.validate(&json!({}), &ResolveOptions::default());
        assert!(report.is_valid());
    }

    #[test]
    fn test_errors_aggregate_across_stages() {
        let blueprint = json!({
            "blueprintVersion": "nah",
            "resources": {},
            "metadata": [],
            "extra": true,
        });
        let options = ResolveOptions::new().with_parameters(json!("hi"));
        let report = ValidationPipeline::default().validate(&blueprint, &options);

        let kinds: Vec<_> = report.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::InvalidVersion,
                ErrorKind::InvalidType,
                ErrorKind::InvalidType,
                ErrorKind::InvalidProperty,
                ErrorKind::InvalidType,
            ]
        );
        assert_eq!(
            report.failed_stages,
            vec![
                "Version Validation",
                "Resources Validation",
                "Metadata Validation",
                "Property Validation",
                "Passed Parameters Validation",
            ]
        );
    }

    struct RejectEverything;

    impl ValidationStage for RejectEverything {
        fn name(&self) -> &str {
            "Reject Everything"
        }

        fn validate(
            &self,
            _blueprint: &Value,
            _options: &ResolveOptions,
        ) -> Result<(), Vec<BlueprintError>> {
            Err(vec![BlueprintError::invalid_value("rejected")])
        }
    }

    #[test]
    fn test_custom_stage() {
        let mut pipeline = ValidationPipeline::new(Vec::new());
        assert!(pipeline.is_valid(&json!({}), &ResolveOptions::default()));

        pipeline.add_stage(Box::new(RejectEverything));
        assert_eq!(pipeline.stage_names(), vec!["Reject Everything"]);
        assert!(!pipeline.is_valid(&json!({}), &ResolveOptions::default()));
    }
}
