//! JSON-LD compaction
//!
//! The normalizer hands the prepared annotation to a [`Compactor`] together
//! with the target context. [`SchemaCompactor`] is a single-root compaction
//! covering what schema.org annotations use: `@vocab`, prefixes, term
//! definitions with type coercion, nested contexts, `@id`, `@reverse`,
//! `@graph`, value objects, `@list` and `@set`.

use crate::context::{is_allowed_sdo_uri, SDO_URI};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::trace;

/// Syntax problems met while compacting
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("\"@type\" value must a string, an array of strings, an empty object, or a default object")]
    InvalidTypeValue { value: Value },

    #[error("the value of \"@vocab\" in a @context must be a string or null")]
    InvalidVocabMapping,

    #[error("@context term values must be strings or objects")]
    InvalidTermDefinition,

    #[error("@context must be an object")]
    InvalidLocalContext,
}

/// Compaction failures, discriminated so the engine can map each one to a
/// report entry without looking at message text
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompactionError {
    #[error("{code}: {url} - {message}")]
    InvalidUrl { code: String, url: String, message: String },

    #[error("Invalid JSON-LD syntax; {0}")]
    Syntax(SyntaxError),

    #[error("{0}")]
    Other(String),
}

impl From<SyntaxError> for CompactionError {
    fn from(error: SyntaxError) -> Self {
        CompactionError::Syntax(error)
    }
}

/// JSON-LD compaction collaborator
#[async_trait]
pub trait Compactor: Send + Sync + std::fmt::Debug {
    /// Compact `document` against `context`.
    ///
    /// The result carries `context` as its `@context`.
    async fn compact(&self, document: &Value, context: &Value) -> Result<Value, CompactionError>;
}

const KEYWORDS: &[&str] = &[
    "@base", "@container", "@context", "@direction", "@graph", "@id", "@import", "@included", "@index", "@json",
    "@language", "@list", "@nest", "@none", "@prefix", "@propagate", "@protected", "@reverse", "@set", "@type",
    "@value", "@version", "@vocab",
];

/// Keys of a local context that are not term definitions
const CONTEXT_KEYWORDS: &[&str] = &[
    "@base", "@direction", "@import", "@language", "@propagate", "@protected", "@version", "@vocab",
];

fn is_keyword(value: &str) -> bool {
    KEYWORDS.contains(&value)
}

#[derive(Debug, Clone, PartialEq)]
struct TermDefinition {
    /// `None` for a term mapped to `null`
    iri: Option<String>,
    /// `@id`, `@vocab` or an expanded datatype IRI
    coercion: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct ActiveContext {
    vocab: Option<String>,
    terms: BTreeMap<String, TermDefinition>,
}

impl ActiveContext {
    /// Expand a term, compact IRI or relative reference.
    ///
    /// `vocab` selects vocabulary-relative resolution (keys and types);
    /// otherwise the value is a document-relative reference and, with no
    /// base IRI, kept as it is. `None` means the value does not map to an IRI.
    fn expand_iri(&self, value: &str, vocab: bool) -> Option<String> {
        if value.starts_with('@') {
            return is_keyword(value).then(|| value.to_string());
        }
        if vocab {
            if let Some(definition) = self.terms.get(value) {
                return definition.iri.clone();
            }
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_string());
            }
            if let Some(TermDefinition { iri: Some(iri), .. }) = self.terms.get(prefix) {
                return Some(format!("{}{}", iri, suffix));
            }
            return Some(value.to_string());
        }
        if vocab {
            self.vocab.as_ref().map(|v| format!("{}{}", v, value))
        } else {
            Some(value.to_string())
        }
    }

    /// Shortest compact form of an absolute IRI
    fn compact_iri(&self, iri: &str, vocab: bool) -> String {
        if is_keyword(iri) {
            return iri.to_string();
        }
        if vocab {
            let exact = self
                .terms
                .iter()
                .filter(|(_, d)| d.iri.as_deref() == Some(iri) && d.coercion.is_none())
                .map(|(term, _)| term)
                .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
            if let Some(term) = exact {
                return term.clone();
            }
            if let Some(suffix) = self.vocab.as_deref().and_then(|v| iri.strip_prefix(v)) {
                if !suffix.is_empty() && !self.terms.contains_key(suffix) {
                    return suffix.to_string();
                }
            }
        }

        self.terms
            .iter()
            .filter(|(term, _)| !term.contains(':'))
            .filter_map(|(term, d)| {
                let prefix = d.iri.as_deref()?;
                if !prefix.ends_with(['/', '#', ':', '?', '[', ']', '@']) {
                    return None;
                }
                let suffix = iri.strip_prefix(prefix)?;
                (!suffix.is_empty()).then(|| format!("{}:{}", term, suffix))
            })
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .unwrap_or_else(|| iri.to_string())
    }
}

/// Built-in compaction for schema.org annotations
#[derive(Debug, Clone, Default)]
pub struct SchemaCompactor;

impl SchemaCompactor {
    pub fn new() -> Self {
        Self
    }

    fn process_context(&self, active: &ActiveContext, local: &Value) -> Result<ActiveContext, CompactionError> {
        match local {
            Value::Null => Ok(ActiveContext::default()),
            Value::String(uri) if is_allowed_sdo_uri(uri) => {
                let mut next = active.clone();
                next.vocab = Some(SDO_URI.to_string());
                Ok(next)
            }
            Value::String(uri) => Err(CompactionError::InvalidUrl {
                code: "loading remote context failed".to_string(),
                url: uri.clone(),
                message: "Dereferencing a URL did not result in a valid JSON-LD object.".to_string(),
            }),
            Value::Array(items) => items
                .iter()
                .try_fold(active.clone(), |ctx, item| self.process_context(&ctx, item)),
            Value::Object(entries) => {
                let mut next = active.clone();
                match entries.get("@vocab") {
                    None => {}
                    Some(Value::Null) => next.vocab = None,
                    Some(Value::String(vocab)) => {
                        next.vocab = Some(next.expand_iri(vocab, true).unwrap_or_else(|| vocab.clone()));
                    }
                    Some(_) => return Err(SyntaxError::InvalidVocabMapping.into()),
                }

                // Prefixes of the same local context may be used by its terms
                let mut scope = next.clone();
                for (term, value) in entries {
                    if let Value::String(iri) = value {
                        scope.terms.insert(
                            term.clone(),
                            TermDefinition {
                                iri: Some(iri.clone()),
                                coercion: None,
                            },
                        );
                    }
                }

                for (term, value) in entries {
                    if CONTEXT_KEYWORDS.contains(&term.as_str()) {
                        continue;
                    }
                    let definition = self.term_definition(&scope, term, value)?;
                    next.terms.insert(term.clone(), definition);
                }
                Ok(next)
            }
            _ => Err(SyntaxError::InvalidLocalContext.into()),
        }
    }

    fn term_definition(&self, scope: &ActiveContext, term: &str, value: &Value) -> Result<TermDefinition, CompactionError> {
        let expand = |iri: &str| -> Option<String> {
            if iri.contains(':') || iri.starts_with('@') {
                let mut without_self = scope.clone();
                without_self.terms.remove(term);
                without_self.expand_iri(iri, false)
            } else {
                scope.expand_iri(iri, true)
            }
        };

        match value {
            Value::Null => Ok(TermDefinition { iri: None, coercion: None }),
            Value::String(iri) => Ok(TermDefinition {
                iri: expand(iri),
                coercion: None,
            }),
            Value::Object(definition) => {
                let iri = match definition.get("@id") {
                    Some(Value::String(iri)) => expand(iri),
                    Some(Value::Null) => None,
                    None => expand(term),
                    Some(_) => return Err(SyntaxError::InvalidTermDefinition.into()),
                };
                let coercion = match definition.get("@type") {
                    None => None,
                    Some(Value::String(t)) if t == "@id" || t == "@vocab" => Some(t.clone()),
                    Some(Value::String(t)) => Some(scope.expand_iri(t, true).unwrap_or_else(|| t.clone())),
                    Some(_) => return Err(SyntaxError::InvalidTermDefinition.into()),
                };
                Ok(TermDefinition { iri, coercion })
            }
            _ => Err(SyntaxError::InvalidTermDefinition.into()),
        }
    }

    fn compact_node(
        &self,
        active: &ActiveContext,
        output: &ActiveContext,
        node: &Map<String, Value>,
    ) -> Result<Map<String, Value>, CompactionError> {
        let ctx = match node.get("@context") {
            Some(local) => self.process_context(active, local)?,
            None => active.clone(),
        };

        // (expanded key, compacted key, compacted value)
        let mut entries: Vec<(String, String, Value)> = Vec::new();

        for (key, value) in node {
            if key == "@context" {
                continue;
            }
            let Some(expanded) = ctx.expand_iri(key, true) else {
                trace!("Dropping key without IRI mapping: {}", key);
                continue;
            };
            if value.is_null() && expanded != "@value" && expanded != "@type" {
                continue;
            }

            let compacted = match expanded.as_str() {
                "@type" => {
                    let types = match value {
                        Value::String(t) => vec![t.as_str()],
                        Value::Array(items) if items.iter().all(Value::is_string) => {
                            items.iter().filter_map(Value::as_str).collect()
                        }
                        _ => return Err(SyntaxError::InvalidTypeValue { value: value.clone() }.into()),
                    };
                    let mut compacted: Vec<Value> = types
                        .into_iter()
                        .map(|t| {
                            let iri = ctx.expand_iri(t, true).unwrap_or_else(|| t.to_string());
                            Value::String(output.compact_iri(&iri, true))
                        })
                        .collect();
                    if compacted.len() == 1 {
                        compacted.remove(0)
                    } else {
                        Value::Array(compacted)
                    }
                }
                "@id" => match value {
                    Value::String(id) => {
                        let iri = ctx.expand_iri(id, false).unwrap_or_else(|| id.clone());
                        Value::String(output.compact_iri(&iri, false))
                    }
                    _ => {
                        return Err(CompactionError::Other(
                            "Invalid JSON-LD syntax; \"@id\" value must a string.".to_string(),
                        ))
                    }
                },
                "@reverse" => match value {
                    Value::Object(reverse) => {
                        let mut plain = reverse.clone();
                        plain.remove("@context");
                        Value::Object(self.compact_node(&ctx, output, &plain)?)
                    }
                    _ => {
                        return Err(CompactionError::Other(
                            "Invalid JSON-LD syntax; \"@reverse\" value must be an object.".to_string(),
                        ))
                    }
                },
                "@graph" | "@list" => Value::Array(self.compact_values(&ctx, output, value, None)?),
                k if is_keyword(k) => value.clone(),
                iri => {
                    if iri.chars().any(char::is_whitespace) || !iri.contains(':') {
                        trace!("Dropping key that is not an absolute IRI: {}", key);
                        continue;
                    }
                    let coercion = ctx.terms.get(key).and_then(|d| d.coercion.clone());
                    let mut values = self.compact_values(&ctx, output, value, coercion.as_deref())?;
                    if values.len() == 1 {
                        values.remove(0)
                    } else {
                        Value::Array(values)
                    }
                }
            };

            let compacted_key = output.compact_iri(&expanded, true);
            entries.push((expanded, compacted_key, compacted));
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut result = Map::new();
        for (_, key, value) in entries {
            match result.remove(&key) {
                Some(existing) => {
                    let mut merged = into_items(existing);
                    merged.extend(into_items(value));
                    result.insert(key, Value::Array(merged));
                }
                None => {
                    result.insert(key, value);
                }
            }
        }
        Ok(result)
    }

    /// Compact the values of one property: arrays are flattened, `@set` is
    /// unwrapped and `null` is dropped
    fn compact_values(
        &self,
        ctx: &ActiveContext,
        output: &ActiveContext,
        value: &Value,
        coercion: Option<&str>,
    ) -> Result<Vec<Value>, CompactionError> {
        let mut flat = Vec::new();
        flatten(value, &mut flat);

        let mut compacted = Vec::with_capacity(flat.len());
        for item in flat {
            if let Some(value) = self.compact_value(ctx, output, item, coercion)? {
                compacted.push(value);
            }
        }
        Ok(compacted)
    }

    fn compact_value(
        &self,
        ctx: &ActiveContext,
        output: &ActiveContext,
        value: &Value,
        coercion: Option<&str>,
    ) -> Result<Option<Value>, CompactionError> {
        let compacted = match value {
            Value::Null => return Ok(None),
            Value::Object(map) if map.contains_key("@value") => {
                let Some(literal) = map.get("@value").filter(|v| !v.is_null()) else {
                    return Ok(None);
                };
                let mut object = Map::new();
                for (key, entry) in map {
                    match key.as_str() {
                        "@type" => {
                            if let Value::String(t) = entry {
                                let iri = ctx.expand_iri(t, true).unwrap_or_else(|| t.clone());
                                object.insert(key.clone(), Value::String(output.compact_iri(&iri, true)));
                            }
                        }
                        "@value" => {}
                        k if k.starts_with('@') && !entry.is_null() => {
                            object.insert(key.clone(), entry.clone());
                        }
                        _ => {}
                    }
                }
                if object.is_empty() {
                    literal.clone()
                } else {
                    object.insert("@value".to_string(), literal.clone());
                    sort_keys(object)
                }
            }
            Value::Object(map) if map.contains_key("@list") => {
                let items = map.get("@list").unwrap_or(&Value::Null);
                let mut object = Map::new();
                object.insert("@list".to_string(), Value::Array(self.compact_values(ctx, output, items, coercion)?));
                Value::Object(object)
            }
            Value::Object(map) => Value::Object(self.compact_node(ctx, output, map)?),
            Value::String(s) => match coercion {
                Some(c @ ("@id" | "@vocab")) => {
                    let iri = ctx.expand_iri(s, c == "@vocab").unwrap_or_else(|| s.clone());
                    let mut object = Map::new();
                    object.insert("@id".to_string(), Value::String(output.compact_iri(&iri, false)));
                    Value::Object(object)
                }
                Some(datatype) => typed_literal(output, datatype, value),
                None => value.clone(),
            },
            Value::Number(_) | Value::Bool(_) => match coercion {
                Some(datatype) if !datatype.starts_with('@') => typed_literal(output, datatype, value),
                _ => value.clone(),
            },
            Value::Array(_) => return Ok(None),
        };
        Ok(Some(compacted))
    }
}

#[async_trait]
impl Compactor for SchemaCompactor {
    async fn compact(&self, document: &Value, context: &Value) -> Result<Value, CompactionError> {
        let output = self.process_context(&ActiveContext::default(), context)?;

        let Value::Object(root) = document else {
            return Err(CompactionError::Other("The document to compact must be a JSON object.".to_string()));
        };
        let mut compacted = self.compact_node(&ActiveContext::default(), &output, root)?;

        let mut result = Map::new();
        result.insert("@context".to_string(), context.clone());

        // A root holding nothing but a graph is the default graph
        if compacted.len() == 1 {
            if let Some(Value::Array(mut nodes)) = compacted.remove("@graph") {
                if nodes.len() == 1 && nodes[0].is_object() {
                    if let Value::Object(node) = nodes.remove(0) {
                        result.extend(node);
                    }
                } else {
                    result.insert("@graph".to_string(), Value::Array(nodes));
                }
                return Ok(Value::Object(result));
            }
        }

        result.extend(compacted);
        Ok(Value::Object(result))
    }
}

fn typed_literal(output: &ActiveContext, datatype: &str, value: &Value) -> Value {
    let mut object = Map::new();
    object.insert("@type".to_string(), Value::String(output.compact_iri(datatype, true)));
    object.insert("@value".to_string(), value.clone());
    Value::Object(object)
}

fn flatten<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| flatten(item, out)),
        Value::Object(map) if map.contains_key("@set") => {
            if let Some(items) = map.get("@set") {
                flatten(items, out);
            }
        }
        other => out.push(other),
    }
}

fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn sort_keys(map: Map<String, Value>) -> Value {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Value::Object(entries.into_iter().collect())
}
