//! Error catalog
//!
//! One constructor per taxonomy entry. Names and descriptions are part of the
//! observable contract and must not be reworded.

use crate::model::{ErrorEntry, ErrorKind, Severity};
use crate::path::AnnotationPath;
use serde_json::Value;

/// Prefix of compacted schema.org terms
pub const SCHEMA_PREFIX: &str = "schema:";

/// Strip the schema.org prefix of a compacted term for display
pub fn pretty_term(term: &str) -> &str {
    term.strip_prefix(SCHEMA_PREFIX).unwrap_or(term)
}

/// Display form of a (possibly multi-typed) term list
pub fn pretty_terms<S: AsRef<str>>(terms: &[S]) -> String {
    terms
        .iter()
        .map(|t| pretty_term(t.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Variants of the 202 description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadContext {
    VocabNotString,
    InvalidFormat,
    NotStringOrObject,
}

/// How a type or property name failed to match the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermMismatch {
    /// Removing blank spaces yields a known term
    BlankSpace,
    /// A case-insensitive match exists; holds the correctly cased name
    Case(String),
    /// Close terms exist; holds the comma separated suggestion list
    Misspell(String),
    Unknown,
}

fn root() -> Option<String> {
    Some(AnnotationPath::root().to_string())
}

fn at(path: &AnnotationPath) -> Option<String> {
    Some(path.to_string())
}

pub fn invalid_json() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonError,
        Severity::Critical,
        101,
        "Invalid JSON",
        "The input annotation can not be parsed to JSON.",
        None,
    )
}

pub fn empty_json() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonError,
        Severity::Critical,
        102,
        "Empty JSON",
        "The input annotation is empty.",
        None,
    )
}

pub fn no_json_object() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonError,
        Severity::Critical,
        103,
        "No JSON Object",
        "The input annotation is not a JSON object, as required.",
        None,
    )
}

pub fn use_of_undefined() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonError,
        Severity::Error,
        104,
        "Use of undefined",
        "The annotation contains an 'undefined' value, which is not conform to the JSON specification.",
        root(),
    )
}

pub fn no_context() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonLdError,
        Severity::Critical,
        201,
        "No @Context",
        "The annotation has no '@context' entry, as expected.",
        root(),
    )
}

pub fn bad_context(reason: BadContext) -> ErrorEntry {
    let description = match reason {
        BadContext::VocabNotString => "The '@context' of the annotation has a '@vocab' value that is not a String. This value should be a string referencing the schema.org vocabulary.",
        BadContext::InvalidFormat => "The '@context' of the annotation has an invalid format.",
        BadContext::NotStringOrObject => "The '@context' of the annotation has a value that is not a String or an Object.",
    };
    ErrorEntry::new(ErrorKind::JsonLdError, Severity::Critical, 202, "Bad @Context", description, root())
}

/// 203 for the root node
pub fn missing_root_type() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonLdError,
        Severity::Error,
        203,
        "No @type",
        "The annotation has no @type.",
        root(),
    )
}

/// 203 for a nested entity
pub fn missing_entity_type(path: &AnnotationPath) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonLdError,
        Severity::Error,
        203,
        "No @type",
        "The annotation has an entity with no @type.",
        at(path),
    )
}

/// 204; the path is unknown when the problem is reported by the compaction step
pub fn bad_type(path: Option<&AnnotationPath>, value: Value) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonLdError,
        Severity::Error,
        204,
        "Bad @type",
        "The annotation has an entity with an invalid @type entry.",
        path.map(ToString::to_string),
    )
    .with_value(value)
}

pub fn double_nested_array() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonLdError,
        Severity::Error,
        205,
        "Double Nested Array",
        "The annotation contains a double nested array, which is not conform to the JSON-LD specification.",
        root(),
    )
}

/// 206 for a `null` used as `@type`
pub fn null_type() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonLdError,
        Severity::Critical,
        206,
        "Use of null",
        "The annotation contains a 'null' value as a @type, which causes errors during the JSON-LD processing.",
        root(),
    )
}

/// 206 for any other `null`
pub fn null_value() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonLdError,
        Severity::Warning,
        206,
        "Use of null",
        "The annotation contains a 'null' value, which is allowed by the JSON-LD specification, but not recommended to use.",
        root(),
    )
}

pub fn empty_string(property: &str, path: &AnnotationPath, value: &str) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::JsonLdError,
        Severity::Warning,
        207,
        "Empty string",
        format!(
            "The annotation has a property ('{}') with an empty string as value.",
            pretty_term(property)
        ),
        at(path),
    )
    .with_value(value)
}

pub fn non_ideal_context() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Warning,
        300,
        "Non-ideal @context",
        "The '@context' of schema.org annotations should be 'https://schema.org/'.",
        root(),
    )
}

pub fn trailing_spaces(property: &str, path: &AnnotationPath, value: &str) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Warning,
        300,
        "Trailing spaces",
        format!(
            "The annotation has a property ('{}') with a value that has trailing spaces. If those spaces do not exist on purpose, they should be deleted.",
            pretty_term(property)
        ),
        at(path),
    )
    .with_value(value)
}

pub fn unknown_range(property: &str, path: &AnnotationPath, id: Option<Value>) -> ErrorEntry {
    let entry = ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Warning,
        300,
        "Unknown range",
        format!(
            "The annotation has a property ('{}') with a referenced value (@id is used) for which the range type is unknown. The conformance of the range can not be verified.",
            pretty_term(property)
        ),
        at(path),
    );
    match id {
        Some(id) => entry.with_value(id),
        None => entry,
    }
}

pub fn non_conform_context() -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Critical,
        301,
        "Non-conform @context",
        "The '@context' of the annotation does not contain the schema.org vocabulary.",
        root(),
    )
}

/// 302 in all four variants
pub fn non_conform_type(raw: &str, mismatch: &TermMismatch, path: &AnnotationPath) -> ErrorEntry {
    let shown = pretty_term(raw);
    let (name, description) = match mismatch {
        TermMismatch::BlankSpace => (
            "Non-conform @type (blank space)",
            format!("The annotation has a @type entry with at least 1 blank space ('{}') that is not conform to schema.org.", shown),
        ),
        TermMismatch::Case(expected) => (
            "Non-conform @type (uppercase/lowercase)",
            format!("The annotation has a @type entry with an uppercase/lowercase error ('{}' that should be '{}').", shown, expected),
        ),
        TermMismatch::Misspell(suggestions) => (
            "Non-conform @type (misspell)",
            format!(
                "The annotation has a wrong spelled @type entry ('{}', could be one of the following: '{}') that is not conform to schema.org.",
                shown, suggestions
            ),
        ),
        TermMismatch::Unknown => (
            "Non-conform @type",
            format!("The annotation has a @type entry ('{}') that is not conform to schema.org.", shown),
        ),
    };
    ErrorEntry::new(ErrorKind::AnnotationError, Severity::Error, 302, name, description, at(path)).with_value(raw)
}

/// 303 in all four variants
pub fn non_conform_property(raw: &str, mismatch: &TermMismatch, path: &AnnotationPath) -> ErrorEntry {
    let shown = pretty_term(raw);
    let (name, description) = match mismatch {
        TermMismatch::BlankSpace => (
            "Non-conform property (blank space)",
            format!("The annotation has a property entry with at least 1 blank space ('{}') that is not conform to schema.org.", shown),
        ),
        TermMismatch::Case(expected) => (
            "Non-conform property (uppercase/lowercase)",
            format!("The annotation has a property entry with an uppercase/lowercase error ('{}' that should be '{}').", shown, expected),
        ),
        TermMismatch::Misspell(suggestions) => (
            "Non-conform property (misspell)",
            format!(
                "The annotation has a wrong spelled property entry ('{}' that could be one of the following: '{}').",
                shown, suggestions
            ),
        ),
        TermMismatch::Unknown => (
            "Non-conform property",
            format!("The annotation has a property entry ('{}') that is not conform to schema.org.", shown),
        ),
    };
    ErrorEntry::new(ErrorKind::AnnotationError, Severity::Error, 303, name, description, at(path)).with_value(raw)
}

pub fn non_conform_action_property(property: &str, path: &AnnotationPath) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Error,
        304,
        "Non-conform action property",
        format!(
            "The annotation has an action property ('{}') with a value that is not a well-formatted string or a PropertyValueSpecification.",
            pretty_term(property)
        ),
        at(path),
    )
    .with_value(property)
}

pub fn non_conform_domain<S: AsRef<str>>(types: &[S], property: &str, path: &AnnotationPath) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Error,
        305,
        "Non-conform domain",
        format!(
            "The annotation has an entity ('{}') with a property that it is not allowed to use ('{}') based on the schema.org vocabulary.",
            pretty_terms(types),
            pretty_term(property)
        ),
        at(path),
    )
    .with_value(property)
}

/// 306 for an entity value whose type is outside the property's range
pub fn non_conform_range_entity<S: AsRef<str>>(property: &str, types: &[S], path: &AnnotationPath) -> ErrorEntry {
    let joined = types.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" + ");
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Error,
        306,
        "Non-conform range",
        format!(
            "The annotation has a property ('{}') with a value type ('{}') that is not conform to schema.org.",
            pretty_term(property),
            pretty_terms(types)
        ),
        at(path),
    )
    .with_value(joined)
}

/// 306 for a literal value
pub fn non_conform_range_literal(property: &str, path: &AnnotationPath, value: Value) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Error,
        306,
        "Non-conform range",
        format!(
            "The annotation has a property ('{}') with a value type that is not conform to schema.org.",
            pretty_term(property)
        ),
        at(path),
    )
    .with_value(value)
}

pub fn non_conform_range_string(property: &str, path: &AnnotationPath, value: &str) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Warning,
        307,
        "Non-conform range (string)",
        format!(
            "The annotation has a property ('{}') with a string as value, although a string is not explicitly allowed as range for this property according to the schema.org vocabulary.",
            pretty_term(property)
        ),
        at(path),
    )
    .with_value(value)
}

pub fn empty_entity(path: &AnnotationPath) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::AnnotationError,
        Severity::Warning,
        309,
        "Empty entity",
        "The annotation has an entity with no properties other than @type.",
        at(path),
    )
}

/// 999 with a free-form description
pub fn execution_error(description: impl Into<String>) -> ErrorEntry {
    ErrorEntry::new(
        ErrorKind::ExecutionError,
        Severity::Critical,
        999,
        "Execution Error",
        description,
        root(),
    )
}

/// 999 for an unresolvable URL met during compaction
pub fn invalid_url(code: &str, url: &str, message: &str) -> ErrorEntry {
    execution_error(format!("{}: {} - {}", code, url, message))
}

/// 999 for any other failure
pub fn generic_execution_error() -> ErrorEntry {
    execution_error(
        "There was an error during the verification process, make sure the sent annotation has a valid serialization.",
    )
}
