//! Vocabulary conformance
//!
//! Walks the normalized annotation and checks every `@type` and property
//! against the vocabulary: unknown terms get a blank space, case or spelling
//! diagnosis, known properties get a domain and a range check.

use crate::datatypes;
use crate::error::{EngineError, EngineResult};
use crate::structure::root_node;
use lazy_static::lazy_static;
use regex::Regex;
use sdocheck_core::catalog::{self, pretty_term, TermMismatch};
use sdocheck_core::{AnnotationPath, ErrorEntry, FuzzyMatcher};
use sdocheck_vocab::{iri, normalize_id, TermKind, Vocabulary};
use serde_json::{Map, Value};

lazy_static! {
    static ref ACTION_PROPERTY_VALUE: Regex =
        Regex::new(r"^\s*([a-z]+=([a-z]?[0-9]?[A-Z]?)+\s)*(required\s*)+(\s*[a-z]+=([a-z]?[0-9]?[A-Z]?)+)*$").unwrap();
}

const ACTION_SUFFIXES: [&str; 2] = ["-input", "-output"];
const PROPERTY_VALUE_SPECIFICATION: &str = "PropertyValueSpecification";

/// Checks a normalized annotation against a vocabulary
#[derive(Debug, Clone, Copy)]
pub struct ConformanceChecker<'a> {
    vocabulary: &'a dyn Vocabulary,
    matcher: FuzzyMatcher,
    max_depth: usize,
}

impl<'a> ConformanceChecker<'a> {
    pub fn new(vocabulary: &'a dyn Vocabulary, matcher: FuzzyMatcher, max_depth: usize) -> Self {
        Self {
            vocabulary,
            matcher,
            max_depth,
        }
    }

    /// Check the root node of `document` and everything below it
    pub fn check(&self, document: &Value) -> EngineResult<Vec<ErrorEntry>> {
        let mut errors = Vec::new();
        if let Value::Object(node) = root_node(document) {
            self.check_node(node, &AnnotationPath::root(), 1, &mut errors)?;
        }
        Ok(errors)
    }

    fn check_node(
        &self,
        node: &Map<String, Value>,
        path: &AnnotationPath,
        depth: usize,
        errors: &mut Vec<ErrorEntry>,
    ) -> EngineResult<()> {
        if depth > self.max_depth {
            return Err(EngineError::DepthLimitExceeded { limit: self.max_depth });
        }

        let mut found_properties = false;
        for (key, value) in node {
            match key.as_str() {
                "@type" => self.check_types(value, path, errors),
                "@id" => found_properties = true,
                "@reverse" => {
                    found_properties = true;
                    self.descend(key, value, path, depth, errors)?;
                }
                k if k.starts_with('@') => {}
                property => {
                    found_properties = true;
                    if !self.is_vocabulary_property(property) {
                        self.check_unknown_property(property, value, path, errors);
                    } else {
                        self.check_domain(node.get("@type"), property, path, errors);
                        self.check_range(property, value, path, errors)?;
                    }
                    self.descend(key, value, path, depth, errors)?;
                }
            }
        }

        if !found_properties {
            errors.push(catalog::empty_entity(path));
        }
        Ok(())
    }

    /// Recurse into the object values of `key`
    fn descend(
        &self,
        key: &str,
        value: &Value,
        path: &AnnotationPath,
        depth: usize,
        errors: &mut Vec<ErrorEntry>,
    ) -> EngineResult<()> {
        for (i, item) in values(value).into_iter().enumerate() {
            if let Value::Object(child) = item {
                self.check_node(child, &path.child(key, i), depth + 1, errors)?;
            }
        }
        Ok(())
    }

    fn check_types(&self, value: &Value, path: &AnnotationPath, errors: &mut Vec<ErrorEntry>) {
        let terms: Vec<&String> = self
            .vocabulary
            .classes()
            .iter()
            .chain(self.vocabulary.enumerations())
            .collect();

        for (j, item) in values(value).into_iter().enumerate() {
            let Some(raw) = item.as_str() else {
                continue;
            };
            if terms.iter().any(|t| t.as_str() == raw) {
                continue;
            }
            let mismatch = self.mismatch(raw, &terms);
            errors.push(catalog::non_conform_type(raw, &mismatch, &path.child("@type", j)));
        }
    }

    fn check_unknown_property(&self, property: &str, value: &Value, path: &AnnotationPath, errors: &mut Vec<ErrorEntry>) {
        if self.is_action_property(property) {
            if !is_valid_action_value(value) {
                errors.push(catalog::non_conform_action_property(property, path));
            }
            return;
        }

        let terms: Vec<&String> = self.vocabulary.properties().iter().collect();
        let mismatch = self.mismatch(property, &terms);
        errors.push(catalog::non_conform_property(property, &mismatch, path));
    }

    /// Diagnose a term missing from `terms`: blank spaces, then case, then spelling
    fn mismatch(&self, raw: &str, terms: &[&String]) -> TermMismatch {
        let without_spaces = raw.replace(' ', "");
        if terms.iter().any(|t| **t == without_spaces) {
            return TermMismatch::BlankSpace;
        }

        let lower = raw.to_lowercase();
        if let Some(term) = terms.iter().find(|t| t.to_lowercase() == lower) {
            return TermMismatch::Case(pretty_term(term).to_string());
        }

        match self.matcher.suggestion_list(raw, terms.iter().copied()) {
            Some(list) => TermMismatch::Misspell(list),
            None => TermMismatch::Unknown,
        }
    }

    /// Exact compact identifier of a property; full IRIs do not count, the
    /// same as for `@type` entries
    fn is_vocabulary_property(&self, term: &str) -> bool {
        self.vocabulary.properties().binary_search_by(|p| p.as_str().cmp(term)).is_ok()
    }

    /// `<property>-input` or `<property>-output` for a known property
    fn is_action_property(&self, property: &str) -> bool {
        ACTION_SUFFIXES.iter().any(|suffix| {
            property
                .strip_suffix(suffix)
                .map(|base| self.is_vocabulary_property(base))
                .unwrap_or(false)
        })
    }

    fn check_domain(&self, types: Option<&Value>, property: &str, path: &AnnotationPath, errors: &mut Vec<ErrorEntry>) {
        let Some(types) = types.and_then(type_names) else {
            return;
        };
        if types.is_empty() || !types.iter().all(|t| self.vocabulary.is_class_or_enumeration(t)) {
            return;
        }

        let id = normalize_id(property);
        let legit = types.iter().any(|t| {
            self.vocabulary
                .class_properties(t, true)
                .map(|properties| properties.contains(&id))
                .unwrap_or(false)
        });
        if !legit {
            errors.push(catalog::non_conform_domain(&types, property, path));
        }
    }

    fn check_range(
        &self,
        property: &str,
        value: &Value,
        path: &AnnotationPath,
        errors: &mut Vec<ErrorEntry>,
    ) -> EngineResult<()> {
        let ranges = self.vocabulary.ranges(property, false, None)?;
        let has = |range: &str| ranges.iter().any(|r| r == range);

        for (p, item) in values(value).into_iter().enumerate() {
            let item_path = path.child(property, p);
            let legit = match item {
                Value::Number(_) => has(iri::NUMBER) || has(iri::INTEGER) || has(iri::FLOAT) || has(iri::THING),
                Value::Bool(_) => has(iri::BOOLEAN) || has(iri::THING),
                Value::String(raw) => {
                    let trimmed = raw.trim();
                    if trimmed != raw && !raw.replace(' ', "").is_empty() {
                        errors.push(catalog::trailing_spaces(property, &item_path, raw));
                    }
                    self.is_legit_string(trimmed, &ranges)
                }
                Value::Object(entity) => {
                    self.check_entity_range(property, entity, &ranges, &item_path, errors);
                    true
                }
                Value::Null | Value::Array(_) => true,
            };

            if let Value::String(raw) = item {
                if !legit {
                    let class_ranges = self
                        .vocabulary
                        .ranges(property, false, Some(&[TermKind::Class, TermKind::Enumeration]))?;
                    if class_ranges.is_empty() {
                        errors.push(catalog::non_conform_range_literal(property, &item_path, item.clone()));
                    } else {
                        errors.push(catalog::non_conform_range_string(property, &item_path, raw));
                    }
                }
                if raw.replace(' ', "").is_empty() {
                    errors.push(catalog::empty_string(property, &item_path, raw));
                }
            } else if !legit {
                errors.push(catalog::non_conform_range_literal(property, &item_path, item.clone()));
            }
        }
        Ok(())
    }

    /// Literal coercion in fixed order: text, number, integer, boolean, URL,
    /// time, date-time, date, enumeration member
    fn is_legit_string(&self, value: &str, ranges: &[String]) -> bool {
        let has = |range: &str| ranges.iter().any(|r| r == range);

        (has(iri::TEXT) || has(iri::THING))
            || ((has(iri::NUMBER) || has(iri::FLOAT)) && datatypes::is_number(value))
            || (has(iri::INTEGER) && datatypes::is_integer(value))
            || (has(iri::BOOLEAN) && (value == "true" || value == "false"))
            || (has(iri::URL) && datatypes::is_url(value))
            || (has(iri::TIME) && datatypes::is_time(value))
            || (has(iri::DATE_TIME) && datatypes::is_date_time(value))
            || (has(iri::DATE) && datatypes::is_date(value))
            || ranges.iter().any(|r| self.is_enumeration_value(r, value))
    }

    /// A string naming a member of `range`; an enumeration without known
    /// members accepts any string
    fn is_enumeration_value(&self, range: &str, value: &str) -> bool {
        if !self.vocabulary.enumerations().iter().any(|e| e == range) {
            return false;
        }
        let members = self.vocabulary.enumeration_members(range).unwrap_or_default();
        let name = normalize_id(value);
        members.is_empty() || members.iter().any(|m| pretty_term(m) == pretty_term(&name))
    }

    fn check_entity_range(
        &self,
        property: &str,
        entity: &Map<String, Value>,
        ranges: &[String],
        path: &AnnotationPath,
        errors: &mut Vec<ErrorEntry>,
    ) {
        match (entity.get("@type"), entity.get("@id")) {
            (Some(types), _) => {
                let types = type_names(types).unwrap_or_default();
                if !self.is_type_in_range(&types, ranges) {
                    errors.push(catalog::non_conform_range_entity(property, &types, path));
                }
            }
            (None, Some(id)) => {
                let shown = (!id.is_array() && !id.is_object()).then(|| id.clone());
                errors.push(catalog::unknown_range(property, path, shown));
            }
            (None, None) => errors.push(catalog::missing_entity_type(path)),
        }
    }

    /// Some type equals a range or is one of its subclasses
    fn is_type_in_range(&self, types: &[&str], ranges: &[String]) -> bool {
        ranges.iter().any(|range| {
            if types.iter().any(|t| t == range) {
                return true;
            }
            self.vocabulary
                .sub_classes(range, true)
                .map(|subs| subs.iter().any(|s| types.contains(&s.as_str())))
                .unwrap_or(false)
        })
    }
}

/// Singleton or array value as a list
fn values(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// The `@type` strings of a node, `None` if some entry is not a string
fn type_names(value: &Value) -> Option<Vec<&str>> {
    values(value).into_iter().map(Value::as_str).collect()
}

fn is_valid_action_value(value: &Value) -> bool {
    match value {
        Value::String(text) => ACTION_PROPERTY_VALUE.is_match(text),
        Value::Object(object) => match object.get("@type") {
            Some(Value::String(t)) => t.ends_with(PROPERTY_VALUE_SPECIFICATION),
            Some(Value::Array(types)) => types
                .iter()
                .filter_map(Value::as_str)
                .any(|t| t.ends_with(PROPERTY_VALUE_SPECIFICATION)),
            _ => false,
        },
        _ => false,
    }
}
