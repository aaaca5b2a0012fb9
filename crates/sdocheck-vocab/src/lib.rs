//! # sdocheck vocabulary
//!
//! Read-only view over the schema.org vocabulary graph:
//! - class, enumeration, data type and property listings
//! - transitive `rdfs:subClassOf` closure
//! - domain and range resolution with inheritance
//!
//! The graph is built once (usually from the official schema.org JSON-LD
//! file) and then shared between verifications behind an `Arc`.

pub mod graph;
pub mod loader;
pub mod model;

#[cfg(feature = "bundled")]
pub mod bundled;

pub use graph::{SchemaVocabulary, VocabularyBuilder};
pub use model::{ClassTerm, EnumerationMember, PropertyTerm, Term, TermKind};

/// Well-known identifiers
pub mod iri {
    pub const SCHEMA_HTTP: &str = "http://schema.org/";
    pub const SCHEMA_HTTPS: &str = "https://schema.org/";
    pub const SCHEMA_PREFIX: &str = "schema:";

    pub const RDFS_CLASS: &str = "rdfs:Class";
    pub const RDFS_SUBCLASS_OF: &str = "rdfs:subClassOf";
    pub const RDF_PROPERTY: &str = "rdf:Property";
    pub const DOMAIN_INCLUDES: &str = "schema:domainIncludes";
    pub const RANGE_INCLUDES: &str = "schema:rangeIncludes";

    pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    pub const THING: &str = "schema:Thing";
    pub const DATA_TYPE: &str = "schema:DataType";
    pub const ENUMERATION: &str = "schema:Enumeration";
    pub const TEXT: &str = "schema:Text";
    pub const URL: &str = "schema:URL";
    pub const NUMBER: &str = "schema:Number";
    pub const INTEGER: &str = "schema:Integer";
    pub const FLOAT: &str = "schema:Float";
    pub const BOOLEAN: &str = "schema:Boolean";
    pub const DATE: &str = "schema:Date";
    pub const DATE_TIME: &str = "schema:DateTime";
    pub const TIME: &str = "schema:Time";
    pub const PROPERTY_VALUE_SPECIFICATION: &str = "schema:PropertyValueSpecification";
}

/// Rewrite a schema.org IRI (`http(s)://schema.org/Person`) to its compact
/// form (`schema:Person`). Other identifiers are returned unchanged.
pub fn normalize_id(id: &str) -> String {
    for ns in [iri::SCHEMA_HTTP, iri::SCHEMA_HTTPS] {
        if let Some(local) = id.strip_prefix(ns) {
            return format!("{}{}", iri::SCHEMA_PREFIX, local);
        }
    }
    if let Some(local) = id.strip_prefix(iri::RDFS_NS) {
        return format!("rdfs:{}", local);
    }
    if let Some(local) = id.strip_prefix(iri::RDF_NS) {
        return format!("rdf:{}", local);
    }
    id.to_string()
}

/// Vocabulary errors
#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    #[error("Term not found in vocabulary: {0}")]
    NotFound(String),

    #[error("Invalid vocabulary document: {0}")]
    InvalidDocument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only queries over a vocabulary.
///
/// Identifiers are compact schema.org terms (`schema:Person`); full
/// schema.org IRIs are accepted as well. Listing methods return sorted
/// identifiers. Lookups of unknown terms fail with [`VocabError::NotFound`].
pub trait Vocabulary: Send + Sync + std::fmt::Debug {
    /// Classes, without enumerations and data types
    fn classes(&self) -> &[String];

    fn properties(&self) -> &[String];

    fn enumerations(&self) -> &[String];

    fn data_types(&self) -> &[String];

    /// Class, enumeration or data type
    fn class(&self, id: &str) -> Result<&ClassTerm, VocabError>;

    fn property(&self, id: &str) -> Result<&PropertyTerm, VocabError>;

    fn term(&self, id: &str) -> Result<Term<'_>, VocabError>;

    /// Properties usable on a class; with `inherited`, also those of every superclass
    fn class_properties(&self, id: &str, inherited: bool) -> Result<Vec<String>, VocabError>;

    /// Direct subclasses, or with `inherited` the whole descendant closure
    fn sub_classes(&self, id: &str, inherited: bool) -> Result<Vec<String>, VocabError>;

    /// Direct superclasses, or with `inherited` the whole ancestor closure
    fn super_classes(&self, id: &str, inherited: bool) -> Result<Vec<String>, VocabError>;

    /// Declared domains; with `inherited`, also all of their subclasses
    fn domains(&self, id: &str, inherited: bool) -> Result<Vec<String>, VocabError>;

    /// Declared ranges; with `inherited`, also all of their subclasses.
    /// `filter` keeps only ranges of the given kinds.
    fn ranges(&self, id: &str, inherited: bool, filter: Option<&[TermKind]>) -> Result<Vec<String>, VocabError>;

    /// Members of an enumeration, including those of its sub-enumerations
    fn enumeration_members(&self, id: &str) -> Result<Vec<String>, VocabError>;

    fn is_class_or_enumeration(&self, id: &str) -> bool {
        self.class(id)
            .map(|c| matches!(c.kind, TermKind::Class | TermKind::Enumeration))
            .unwrap_or(false)
    }

    fn is_property(&self, id: &str) -> bool {
        self.property(id).is_ok()
    }
}
