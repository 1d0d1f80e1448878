//! Orchestration of a full validation/resolution pass.

pub mod engine;
pub mod outcome;

pub use engine::BlueprintEngine;
pub use outcome::{ResolveOutcome, ResolveStats};
