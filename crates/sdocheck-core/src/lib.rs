//! # sdocheck core
//!
//! Shared building blocks of the schema.org annotation verifier:
//! the report model, the error catalog, annotation paths and fuzzy term
//! matching.

pub mod catalog;
pub mod fuzzy;
pub mod model;
pub mod path;

pub use catalog::{BadContext, TermMismatch, SCHEMA_PREFIX};
pub use fuzzy::{FuzzyMatcher, Suggestion};
pub use model::*;
pub use path::{AnnotationPath, PathError, PathSegment};
