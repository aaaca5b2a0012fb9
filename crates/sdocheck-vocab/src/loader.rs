//! Vocabulary loading from the schema.org JSON-LD distribution
//!
//! Reads the `@graph` of `schemaorg-current-https.jsonld` (or any document
//! shaped like it). Nodes typed `rdf:Property` become properties, nodes typed
//! `rdfs:Class` become classes (data types when also typed `schema:DataType`),
//! and every other typed node is kept as an individual, which is how
//! enumeration members are declared.

use crate::graph::{SchemaVocabulary, VocabularyBuilder};
use crate::{iri, normalize_id, VocabError};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Load a vocabulary from a JSON-LD file on disk
pub fn from_path(path: impl AsRef<Path>) -> Result<SchemaVocabulary, VocabError> {
    let path = path.as_ref();
    info!("Loading vocabulary from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn from_json_str(content: &str) -> Result<SchemaVocabulary, VocabError> {
    let document: Value = serde_json::from_str(content)?;
    from_jsonld(&document)
}

/// Build a vocabulary from a parsed JSON-LD document
pub fn from_jsonld(document: &Value) -> Result<SchemaVocabulary, VocabError> {
    let nodes = match document {
        Value::Object(map) => match map.get("@graph") {
            Some(Value::Array(nodes)) => nodes.as_slice(),
            Some(_) => return Err(VocabError::InvalidDocument("@graph must be an array".to_string())),
            None => std::slice::from_ref(document),
        },
        Value::Array(nodes) => nodes.as_slice(),
        _ => return Err(VocabError::InvalidDocument("expected a JSON-LD object or array".to_string())),
    };

    let mut builder = VocabularyBuilder::new();
    let mut skipped = 0usize;

    for node in nodes {
        let Value::Object(node) = node else {
            skipped += 1;
            continue;
        };
        let Some(id) = node.get("@id").and_then(Value::as_str) else {
            skipped += 1;
            continue;
        };
        let types = ids(node.get("@type"));

        if types.iter().any(|t| t == iri::RDF_PROPERTY) {
            builder.property(
                id,
                ids(lookup(node, iri::DOMAIN_INCLUDES)),
                ids(lookup(node, iri::RANGE_INCLUDES)),
            );
        } else if types.iter().any(|t| t == iri::RDFS_CLASS || t == iri::DATA_TYPE) {
            let supers = ids(lookup(node, iri::RDFS_SUBCLASS_OF));
            if types.iter().any(|t| t == iri::DATA_TYPE) {
                builder.data_type(id, supers);
            } else {
                builder.class(id, supers);
            }
        } else if !types.is_empty() {
            builder.instance(id, types);
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        debug!("Skipped {} vocabulary nodes without @id or @type", skipped);
    }

    let vocabulary = builder.build();
    if vocabulary.is_empty() {
        return Err(VocabError::InvalidDocument("no vocabulary terms found".to_string()));
    }
    info!("Loaded vocabulary with {} terms", vocabulary.len());
    Ok(vocabulary)
}

impl SchemaVocabulary {
    pub fn from_jsonld(document: &Value) -> Result<Self, VocabError> {
        from_jsonld(document)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, VocabError> {
        from_json_str(content)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VocabError> {
        from_path(path)
    }
}

/// Read a predicate by its compact name or by its full IRI
fn lookup<'a>(node: &'a Map<String, Value>, compact: &str) -> Option<&'a Value> {
    if let Some(value) = node.get(compact) {
        return Some(value);
    }
    node.iter()
        .find(|(key, _)| key.starts_with("http") && normalize_id(key) == compact)
        .map(|(_, value)| value)
}

/// Identifiers referenced by a value: `"x"`, `{"@id": "x"}` or arrays of those
fn ids(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(id)) => vec![normalize_id(id)],
        Some(Value::Object(map)) => map
            .get("@id")
            .and_then(Value::as_str)
            .map(normalize_id)
            .into_iter()
            .collect(),
        Some(Value::Array(items)) => items.iter().flat_map(|item| ids(Some(item))).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TermKind, Vocabulary};
    use serde_json::json;
    use std::io::Write;

    fn document() -> Value {
        json!({
            "@context": {"schema": "http://schema.org/", "rdfs": "http://www.w3.org/2000/01/rdf-schema#"},
            "@graph": [
                {"@id": "schema:Thing", "@type": "rdfs:Class"},
                {"@id": "schema:Person", "@type": "rdfs:Class", "rdfs:subClassOf": {"@id": "schema:Thing"}},
                {"@id": "http://schema.org/Event", "@type": "rdfs:Class",
                 "http://www.w3.org/2000/01/rdf-schema#subClassOf": "http://schema.org/Thing"},
                {"@id": "schema:Text", "@type": ["schema:DataType", "rdfs:Class"]},
                {"@id": "schema:name", "@type": "rdf:Property",
                 "schema:domainIncludes": {"@id": "schema:Thing"},
                 "schema:rangeIncludes": [{"@id": "schema:Text"}]},
                {"@id": "schema:Monday", "@type": "schema:Thing"},
                {"rdfs:label": "anonymous"},
                "garbage"
            ]
        })
    }

    #[test]
    fn test_from_jsonld() {
        let vocab = from_jsonld(&document()).unwrap();
        assert_eq!(vocab.classes(), &["schema:Event", "schema:Person", "schema:Thing"]);
        assert_eq!(vocab.data_types(), &["schema:Text"]);
        assert_eq!(vocab.properties(), &["schema:name"]);
        assert_eq!(vocab.super_classes("schema:Event", false).unwrap(), vec!["schema:Thing"]);
        assert_eq!(vocab.ranges("schema:name", false, None).unwrap(), vec!["schema:Text"]);
        assert_eq!(vocab.term("schema:Monday").unwrap().kind(), TermKind::EnumerationMember);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(from_json_str("{"), Err(VocabError::Json(_))));
        assert!(matches!(from_jsonld(&json!(42)), Err(VocabError::InvalidDocument(_))));
        assert!(matches!(from_jsonld(&json!({"@graph": {}})), Err(VocabError::InvalidDocument(_))));
        assert!(matches!(from_jsonld(&json!({"@graph": []})), Err(VocabError::InvalidDocument(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", document()).unwrap();
        let vocab = SchemaVocabulary::from_path(file.path()).unwrap();
        assert!(vocab.is_property("schema:name"));

        assert!(matches!(from_path("/nonexistent/vocabulary.jsonld"), Err(VocabError::Io(_))));
    }
}
