//! `@context` validation

use lazy_static::lazy_static;
use regex::Regex;
use sdocheck_core::{catalog, BadContext, ErrorEntry};
use serde_json::Value;

lazy_static! {
    static ref RECOMMENDED_SDO_CONTEXT: Regex = Regex::new(r"^https?://schema\.org/?$").unwrap();
    static ref ALLOWED_SDO_CONTEXT: Regex = Regex::new(r"^(https?://)?(www\.)?schema\.org/?$").unwrap();
}

/// Canonical schema.org IRI used for normalization
pub const SDO_URI: &str = "http://schema.org/";

/// `http(s)://schema.org` with an optional trailing slash
pub fn is_recommended_sdo_uri(uri: &str) -> bool {
    RECOMMENDED_SDO_CONTEXT.is_match(uri)
}

/// Any accepted spelling of the schema.org IRI (scheme and `www.` optional)
pub fn is_allowed_sdo_uri(uri: &str) -> bool {
    ALLOWED_SDO_CONTEXT.is_match(uri)
}

/// Outcome of the `@context` check
#[derive(Debug, Default)]
pub struct ContextCheck {
    /// `false` only when the annotation has no `@context` at all
    pub present: bool,
    pub errors: Vec<ErrorEntry>,
}

/// Check the root `@context` of an annotation
pub fn check(annotation: &Value) -> ContextCheck {
    let Some(context) = annotation.get("@context") else {
        return ContextCheck {
            present: false,
            errors: vec![catalog::no_context()],
        };
    };

    let mut errors = Vec::new();
    match context {
        Value::String(uri) => {
            if !is_allowed_sdo_uri(uri) {
                errors.push(catalog::non_conform_context());
            } else if !is_recommended_sdo_uri(uri) {
                errors.push(catalog::non_ideal_context());
            }
        }
        Value::Object(entries) => {
            let mut found_sdo = false;
            let mut found_error = false;

            if let Some(vocab) = entries.get("@vocab").filter(|v| is_truthy(v)) {
                match vocab {
                    Value::String(uri) if !is_allowed_sdo_uri(uri) => {
                        errors.push(catalog::non_conform_context());
                        found_error = true;
                    }
                    Value::String(uri) if !is_recommended_sdo_uri(uri) => {
                        errors.push(catalog::non_ideal_context());
                        found_error = true;
                    }
                    Value::String(_) => found_sdo = true,
                    _ => {
                        errors.push(catalog::bad_context(BadContext::VocabNotString));
                        found_error = true;
                    }
                }
            }

            for (key, value) in entries {
                if key == "@vocab" {
                    continue;
                }
                match value {
                    Value::String(uri) if is_recommended_sdo_uri(uri) => found_sdo = true,
                    Value::String(uri) if is_allowed_sdo_uri(uri) => {
                        errors.push(catalog::non_ideal_context());
                        found_error = true;
                        found_sdo = true;
                    }
                    Value::String(_) => {}
                    _ => {
                        errors.push(catalog::bad_context(BadContext::InvalidFormat));
                        found_error = true;
                    }
                }
            }

            if !found_error && !found_sdo {
                errors.push(catalog::non_conform_context());
            }
        }
        _ => errors.push(catalog::bad_context(BadContext::NotStringOrObject)),
    }

    ContextCheck { present: true, errors }
}

/// JavaScript truthiness of a JSON value
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
