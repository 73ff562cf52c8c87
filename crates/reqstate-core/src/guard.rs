//! Predicates over JSON values.
//!
//! Used to validate caller-supplied parameters before they reach a
//! request.

use serde_json::Value;

/// Lower-case type name of a JSON value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn is_valid_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

pub fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(serde_json::Map::is_empty)
}

/// Arrays with no non-null element.
pub fn is_empty_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_null))
}

/// Non-null, and not an empty string, object or array.
pub fn is_valid_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(_) => is_valid_string(value),
        Value::Object(_) => !is_empty_object(value),
        Value::Array(_) => !is_empty_array(value),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
