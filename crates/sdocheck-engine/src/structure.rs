//! Structural checks on the normalized annotation

use crate::error::{EngineError, EngineResult};
use sdocheck_core::{catalog, AnnotationPath, ErrorEntry};
use serde_json::{Map, Value};

/// Node treated as the root of the annotation.
///
/// A top-level `@graph` is assumed to hold a single root as its first item.
pub fn root_node(document: &Value) -> &Value {
    match document.get("@graph") {
        Some(Value::Array(items)) if !items.is_empty() => &items[0],
        Some(graph @ Value::Object(_)) => graph,
        _ => document,
    }
}

/// Check that the root has a `@type` and that every `@type` in the tree is a
/// string or an array of strings
pub fn check(document: &Value, max_depth: usize) -> EngineResult<Vec<ErrorEntry>> {
    let mut errors = Vec::new();
    if let Value::Object(node) = root_node(document) {
        check_node(node, &AnnotationPath::root(), 1, max_depth, &mut errors)?;
    }
    Ok(errors)
}

fn check_node(
    node: &Map<String, Value>,
    path: &AnnotationPath,
    depth: usize,
    max_depth: usize,
    errors: &mut Vec<ErrorEntry>,
) -> EngineResult<()> {
    if depth > max_depth {
        return Err(EngineError::DepthLimitExceeded { limit: max_depth });
    }

    match node.get("@type") {
        None if path.is_root() => errors.push(catalog::missing_root_type()),
        None | Some(Value::String(_)) => {}
        Some(Value::Array(types)) => {
            if let Some((i, bad)) = types.iter().enumerate().find(|(_, t)| !t.is_string()) {
                errors.push(catalog::bad_type(Some(&path.child("@type", i)), bad.clone()));
            }
        }
        Some(bad) => errors.push(catalog::bad_type(Some(&path.child("@type", 0)), bad.clone())),
    }

    for (key, value) in node {
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if let Value::Object(child) = item {
                        check_node(child, &path.child(key, i), depth + 1, max_depth, errors)?;
                    }
                }
            }
            Value::Object(child) => check_node(child, &path.child(key, 0), depth + 1, max_depth, errors)?,
            _ => {}
        }
    }
    Ok(())
}
