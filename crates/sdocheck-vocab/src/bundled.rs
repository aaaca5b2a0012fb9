//! Reduced schema.org vocabulary compiled into the crate
//!
//! Covers the classes, enumerations, data types and properties needed to
//! exercise every verification path without shipping the full distribution.

use crate::graph::SchemaVocabulary;
use crate::{loader, VocabError};

pub const REDUCED_VOCABULARY_JSONLD: &str = include_str!("../fixtures/schemaorg-mini.jsonld");

pub fn reduced_vocabulary() -> Result<SchemaVocabulary, VocabError> {
    loader::from_json_str(REDUCED_VOCABULARY_JSONLD)
}
