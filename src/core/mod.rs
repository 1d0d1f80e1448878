//! Core types for blueprint processing.
//!
//! This module contains the fundamental building blocks:
//! - Error taxonomy and result types
//! - Shape predicates
//! - The blueprint document model
//! - Invocation options and input parsing

pub mod blueprint;
pub mod error;
pub mod input;
pub mod options;
pub mod predicates;

pub use blueprint::{Blueprint, BlueprintVersion, Output, ParameterDecl, ParameterType, Resource};
pub use error::{BlueprintError, BlueprintFault, ConfigError, ErrorKind, ValidationReport};
pub use input::{BlueprintInput, Parsed};
pub use options::ResolveOptions;
