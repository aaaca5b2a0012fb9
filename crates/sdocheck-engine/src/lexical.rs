//! Lexical analysis: turn the raw input into one annotation object

use crate::input::InputValue;
use sdocheck_core::{catalog, ErrorEntry};
use serde_json::Value;
use tracing::debug;

/// Parse and sanity-check the raw input.
///
/// Returns the owned annotation object, or the single gate error that ends
/// the verification.
pub fn analyze(input: InputValue) -> Result<InputValue, ErrorEntry> {
    let annotation = match input {
        InputValue::Undefined | InputValue::Null => return Err(catalog::empty_json()),
        InputValue::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => InputValue::from(value),
            Err(e) => {
                debug!("Annotation is not valid JSON: {}", e);
                return Err(catalog::invalid_json());
            }
        },
        other => other,
    };

    match &annotation {
        InputValue::Null => Err(catalog::empty_json()),
        // serializes to `{}` when every member is undefined
        InputValue::Object(members) if members.iter().all(|(_, v)| v.is_undefined()) => Err(catalog::empty_json()),
        InputValue::Array(items) if items.is_empty() => Err(catalog::empty_json()),
        InputValue::Object(_) => Ok(annotation),
        _ => Err(catalog::no_json_object()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code(input: InputValue) -> u16 {
        analyze(input).unwrap_err().error_code()
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(code(InputValue::Null), 102);
        assert_eq!(code(InputValue::Undefined), 102);
        assert_eq!(code(json!({}).into()), 102);
        assert_eq!(code(json!([]).into()), 102);
        assert_eq!(code("null".into()), 102);
        assert_eq!(code("  {}  ".into()), 102);
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(code("{\"@context\": ".into()), 101);
        assert_eq!(code("".into()), 101);
        assert_eq!(code("{'a': 1}".into()), 101);
    }

    #[test]
    fn test_no_object() {
        assert_eq!(code(json!([{"@type": "Person"}]).into()), 103);
        assert_eq!(code(json!(42).into()), 103);
        assert_eq!(code(json!(false).into()), 103);
        assert_eq!(code("\"text\"".into()), 103);
    }

    #[test]
    fn test_object_passes() {
        let annotation = analyze("{\"@type\": \"Person\"}".into()).unwrap();
        assert!(annotation.is_object());

        let annotation = analyze(InputValue::Object(vec![
            ("a".into(), InputValue::Undefined),
            ("b".into(), InputValue::Null),
        ]))
        .unwrap();
        assert_eq!(annotation.get("a"), Some(&InputValue::Undefined));
    }

    #[test]
    fn test_all_undefined_members_is_empty() {
        let input = InputValue::Object(vec![("a".into(), InputValue::Undefined), ("b".into(), InputValue::Undefined)]);
        assert_eq!(code(input), 102);
    }
}
