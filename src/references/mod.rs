//! Reference discovery and resolution.
//!
//! A reference token is a string such as `$.parameters.region` or
//! `$.resources.my-fn.memory`. The [`ReferenceFinder`] records every token in
//! the referenceable sections; the [`ReferenceResolver`] then replaces each
//! one with the scalar it designates.

pub mod finder;
pub mod resolver;

pub use finder::{PropertyKey, ReferenceFinder, ReferenceOccurrence};
pub use resolver::{lookup, ReferenceResolver, Resolution};
