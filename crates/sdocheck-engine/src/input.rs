//! Annotation input model
//!
//! JSON has no `undefined`, but annotations handed over by a host runtime
//! can contain it. [`InputValue`] keeps those markers until the anomaly scan
//! has seen them.

use serde_json::{Map, Number, Value};

/// A JSON value tree that can also hold `undefined`.
///
/// Objects keep their members in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<InputValue>),
    Object(Vec<(String, InputValue)>),
}

impl InputValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, InputValue::Undefined)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, InputValue::Object(_))
    }

    /// Member of an object, `None` for other values and absent keys
    pub fn get(&self, key: &str) -> Option<&InputValue> {
        match self {
            InputValue::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Serialize to plain JSON: `undefined` members are dropped and
    /// `undefined` array elements become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            InputValue::Undefined | InputValue::Null => Value::Null,
            InputValue::Bool(b) => Value::Bool(*b),
            InputValue::Number(n) => Value::Number(n.clone()),
            InputValue::String(s) => Value::String(s.clone()),
            InputValue::Array(items) => Value::Array(items.iter().map(InputValue::to_json).collect()),
            InputValue::Object(members) => {
                let mut map = Map::new();
                for (key, value) in members {
                    if !value.is_undefined() {
                        map.insert(key.clone(), value.to_json());
                    }
                }
                Value::Object(map)
            }
        }
    }

    /// Deepest nesting of arrays and objects, computed without recursion
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((value, level)) = stack.pop() {
            match value {
                InputValue::Array(items) => {
                    max = max.max(level + 1);
                    stack.extend(items.iter().map(|v| (v, level + 1)));
                }
                InputValue::Object(members) => {
                    max = max.max(level + 1);
                    stack.extend(members.iter().map(|(_, v)| (v, level + 1)));
                }
                _ => {}
            }
        }
        max
    }
}

impl From<Value> for InputValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => InputValue::Null,
            Value::Bool(b) => InputValue::Bool(b),
            Value::Number(n) => InputValue::Number(n),
            Value::String(s) => InputValue::String(s),
            Value::Array(items) => InputValue::Array(items.into_iter().map(InputValue::from).collect()),
            Value::Object(map) => InputValue::Object(map.into_iter().map(|(k, v)| (k, InputValue::from(v))).collect()),
        }
    }
}

impl From<&Value> for InputValue {
    fn from(value: &Value) -> Self {
        InputValue::from(value.clone())
    }
}

/// A string input is raw annotation text, parsed by the lexical phase
impl From<&str> for InputValue {
    fn from(text: &str) -> Self {
        InputValue::String(text.to_string())
    }
}

impl From<String> for InputValue {
    fn from(text: String) -> Self {
        InputValue::String(text)
    }
}

impl<T: Into<InputValue>> From<Option<T>> for InputValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(InputValue::Undefined)
    }
}
