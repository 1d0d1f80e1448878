//! # Blueprint Validator
//!
//! Structural validation and reference resolution for JSON blueprint
//! documents. A blueprint declares named resources, parameters and outputs;
//! this crate rejects malformed documents early and then substitutes
//! reference tokens with concrete values before the document is used.
//!
//! ## Features
//!
//! - **Staged validation**: every section is checked independently and all
//!   findings are reported together
//! - **Reference resolution**: `$.parameters.<name>` tokens are filled from
//!   caller-supplied values, `$.resources.<name>.<field>` (and any other
//!   document path) from the document itself
//! - **Best-effort results**: callers always get the document back alongside
//!   any errors or unresolved references
//!
//! ## Quick Start
//!
//! ```rust
//! use blueprint_validator::prelude::*;
//! use serde_json::json;
//!
//! let blueprint = json!({
//!     "blueprintVersion": "2024-10-01",
//!     "resources": [{"name": "a", "type": "x.y", "value": "$.parameters.p"}],
//!     "parameters": [{"name": "p", "type": "string"}],
//! });
//!
//! let options = ResolveOptions::new().with_parameter("p", "hello");
//! let outcome = BlueprintEngine::new()
//!     .validate_and_resolve(blueprint, &options)
//!     .unwrap();
//!
//! assert_eq!(outcome.blueprint["resources"][0]["value"], "hello");
//! assert!(outcome.errors.is_none());
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error taxonomy, predicates, document model, options, input
//! - [`validation`]: multi-stage structural validation pipeline
//! - [`references`]: reference discovery and resolution
//! - [`execution`]: the engine that sequences a full pass

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod execution;
pub mod references;
pub mod validation;

use crate::core::error::BlueprintResult;
use crate::core::input::BlueprintInput;
use crate::core::options::ResolveOptions;
use crate::execution::engine::BlueprintEngine;
use crate::execution::outcome::ResolveOutcome;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use blueprint_validator::prelude::*;
/// ```
pub mod prelude {
    // Document model
    pub use crate::core::blueprint::{
        Blueprint, BlueprintVersion, Output, ParameterDecl, ParameterType, Resource,
    };

    // Errors
    pub use crate::core::error::{
        BlueprintError, BlueprintFault, BlueprintResult, ConfigError, ErrorKind,
        ValidationReport,
    };

    // Input and options
    pub use crate::core::input::BlueprintInput;
    pub use crate::core::options::ResolveOptions;

    // Validation
    pub use crate::validation::pipeline::ValidationPipeline;
    pub use crate::validation::stages::ValidationStage;

    // References
    pub use crate::references::finder::{PropertyKey, ReferenceFinder, ReferenceOccurrence};
    pub use crate::references::resolver::{ReferenceResolver, Resolution};

    // Execution
    pub use crate::execution::engine::BlueprintEngine;
    pub use crate::execution::outcome::{ResolveOutcome, ResolveStats};

    pub use crate::validate_and_resolve;
}

/// Validate a blueprint and resolve its references with the default engine.
pub fn validate_and_resolve(
    input: impl Into<BlueprintInput>,
    options: &ResolveOptions,
) -> BlueprintResult<ResolveOutcome> {
    BlueprintEngine::new().validate_and_resolve(input, options)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
