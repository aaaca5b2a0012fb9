//! Annotation normalization
//!
//! Brings every annotation into one shape before the tree walks: all
//! schema.org aliases collapse onto `http://schema.org/`, the document is
//! compacted against `{"schema": "http://schema.org/"}` and every schema.org
//! term ends up as `schema:<name>`.

use crate::compactor::{CompactionError, Compactor, SyntaxError};
use crate::context::{is_allowed_sdo_uri, is_truthy, SDO_URI};
use sdocheck_core::{catalog, BadContext, ErrorEntry};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

const ESCAPED_SPACE: &str = "%20";

/// Wraps the compaction collaborator with the key and context rewriting it needs
#[derive(Debug, Clone)]
pub struct Normalizer {
    compactor: Arc<dyn Compactor>,
}

impl Normalizer {
    pub fn new(compactor: Arc<dyn Compactor>) -> Self {
        Self { compactor }
    }

    /// Normalize an annotation that passed the `@context` check
    pub async fn normalize(&self, annotation: &Value) -> Result<Value, CompactionError> {
        let mut global_context = Map::new();
        global_context.insert("schema".to_string(), Value::String(SDO_URI.to_string()));

        let prepared = pre_replace(annotation, &mut global_context);
        let context = Value::Object(global_context);
        debug!("Compacting annotation against {}", context);

        let compacted = self.compactor.compact(&prepared, &context).await?;
        Ok(post_replace(compacted))
    }
}

/// Rewrite schema.org contexts to the canonical IRI, collect every other
/// vocabulary declaration into `global_context` and escape spaces in keys
fn pre_replace(value: &Value, global_context: &mut Map<String, Value>) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|item| pre_replace(item, global_context)).collect()),
        Value::Object(node) => {
            let mut result = Map::new();
            let mut escaped = Vec::new();

            for (key, entry) in node {
                let entry = if key == "@context" {
                    rewrite_context(entry, global_context)
                } else {
                    pre_replace(entry, global_context)
                };
                if key.contains(' ') {
                    escaped.push((key.replace(' ', ESCAPED_SPACE), entry));
                } else {
                    result.insert(key.clone(), entry);
                }
            }

            for (key, entry) in escaped {
                result.insert(key, entry);
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

fn rewrite_context(context: &Value, global_context: &mut Map<String, Value>) -> Value {
    match context {
        Value::String(_) => {
            let mut vocab = Map::new();
            vocab.insert("@vocab".to_string(), Value::String(SDO_URI.to_string()));
            Value::Object(vocab)
        }
        Value::Object(entries) => {
            let mut rewritten = Map::new();
            for (key, value) in entries {
                let is_sdo = value.as_str().map(is_allowed_sdo_uri).unwrap_or(false);
                let known = global_context.get(key).map(is_truthy).unwrap_or(false);
                if !is_sdo && key != "schema" && !known {
                    global_context.insert(key.clone(), value.clone());
                    rewritten.insert(key.clone(), value.clone());
                } else {
                    rewritten.insert(key.clone(), Value::String(SDO_URI.to_string()));
                }
            }
            Value::Object(rewritten)
        }
        other => other.clone(),
    }
}

/// Undo the key escaping, moving restored keys behind the untouched ones
fn post_replace(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(post_replace).collect()),
        Value::Object(node) => {
            let mut result = Map::new();
            let mut restored = Vec::new();

            for (key, entry) in node {
                let entry = if key == "@context" { entry } else { post_replace(entry) };
                if key.contains(ESCAPED_SPACE) {
                    restored.push((key.replace(ESCAPED_SPACE, " "), entry));
                } else {
                    result.insert(key, entry);
                }
            }

            for (key, entry) in restored {
                result.insert(key, entry);
            }
            Value::Object(result)
        }
        other => other,
    }
}

/// Report entry for a failed compaction.
///
/// `None` when the failure is a context shape problem that the `@context`
/// check already reported.
pub fn map_compaction_error(error: &CompactionError, reported: &[ErrorEntry]) -> Option<ErrorEntry> {
    match error {
        CompactionError::InvalidUrl { code, url, message } => Some(catalog::invalid_url(code, url, message)),
        CompactionError::Syntax(SyntaxError::InvalidTypeValue { value }) => Some(catalog::bad_type(None, value.clone())),
        CompactionError::Syntax(_) => {
            if reported.iter().any(|e| e.error_code() == 202) {
                None
            } else {
                Some(catalog::bad_context(BadContext::InvalidFormat))
            }
        }
        CompactionError::Other(_) => Some(catalog::generic_execution_error()),
    }
}
