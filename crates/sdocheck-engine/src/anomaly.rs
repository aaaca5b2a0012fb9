//! Anomaly scan over the raw annotation
//!
//! Runs before the annotation is serialized for compaction, since that step
//! silently drops `undefined` members.

use crate::error::{EngineError, EngineResult};
use crate::input::InputValue;
use sdocheck_core::{catalog, ErrorEntry};

/// Report `undefined`, `null` and double nested arrays anywhere in the tree
pub fn scan(annotation: &InputValue, max_depth: usize) -> EngineResult<Vec<ErrorEntry>> {
    let mut errors = Vec::new();
    if let InputValue::Object(members) = annotation {
        scan_object(members, 1, max_depth, &mut errors)?;
    }
    Ok(errors)
}

fn scan_object(
    members: &[(String, InputValue)],
    depth: usize,
    max_depth: usize,
    errors: &mut Vec<ErrorEntry>,
) -> EngineResult<()> {
    if depth > max_depth {
        return Err(EngineError::DepthLimitExceeded { limit: max_depth });
    }

    for (key, value) in members {
        match value {
            InputValue::Undefined => errors.push(catalog::use_of_undefined()),
            InputValue::Null => errors.push(null_entry(key)),
            InputValue::Object(nested) => scan_object(nested, depth + 1, max_depth, errors)?,
            InputValue::Array(items) => {
                for item in items {
                    match item {
                        InputValue::Undefined => errors.push(catalog::use_of_undefined()),
                        InputValue::Null => errors.push(null_entry(key)),
                        InputValue::Object(nested) => scan_object(nested, depth + 2, max_depth, errors)?,
                        InputValue::Array(_) => errors.push(catalog::double_nested_array()),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn null_entry(key: &str) -> ErrorEntry {
    if key == "@type" {
        catalog::null_type()
    } else {
        catalog::null_value()
    }
}
