//! Structural validation of blueprints.
//!
//! The validation pipeline runs before reference resolution to reject
//! malformed documents early.

pub mod pipeline;
pub mod stages;

pub use pipeline::ValidationPipeline;
pub use stages::{
    MetadataValidation, OutputsValidation, ParametersValidation, PassedParametersValidation,
    PropertyValidation, ResourcesValidation, ValidationStage, ValuesValidation,
    VersionValidation,
};
