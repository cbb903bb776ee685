//! JSON codec for wire-level delta records.
//!
//! A record is `{"Operation": <name>, "Path": [...], "Value"?: <json>}` with
//! `Value` present iff the operation carries a payload.

use serde_json::{Map, Value};

use super::types::{carries_payload, Delta};
use crate::error::RevelationError;
use crate::path::path_to_json;
use crate::value::InputValue;

fn invalid(msg: impl Into<String>) -> RevelationError {
    RevelationError::InvalidDelta(msg.into())
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize a `Delta` to its wire record.
pub fn to_json(delta: &Delta) -> Value {
    let mut m = Map::new();
    m.insert("Operation".into(), Value::String(delta.op_name().to_string()));
    m.insert("Path".into(), path_to_json(delta.path()));
    if let Some(value) = delta.value() {
        m.insert("Value".into(), value);
    }
    Value::Object(m)
}

/// Serialize a delta log to a JSON array.
pub fn to_json_deltas(deltas: &[Delta]) -> Value {
    Value::Array(deltas.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one wire record.
///
/// Runs the same path, payload and root checks as the operation methods of
/// an action revelation, so a decoded delta is always one a revelation could
/// have recorded.
pub fn from_json(v: &Value) -> Result<Delta, RevelationError> {
    let obj = v
        .as_object()
        .ok_or_else(|| invalid("Delta must be an object."))?;
    let op = match obj.get("Operation") {
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(invalid("Operation must be a string.")),
        None => return Err(invalid("Delta is missing its Operation.")),
    };
    if let Some(extra) = obj.keys().find(|k| !matches!(k.as_str(), "Operation" | "Path" | "Value")) {
        return Err(invalid(format!("Unexpected member \"{extra}\".")));
    }
    let path = obj.get("Path").map_or(InputValue::Undefined, InputValue::from);
    let value = obj.get("Value").map_or(InputValue::Undefined, InputValue::from);
    let delta = Delta::build(op, &path, &value)?;
    if !carries_payload(op) && obj.contains_key("Value") {
        return Err(invalid(format!("{op} does not take a Value.")));
    }
    Ok(delta)
}

/// Deserialize a JSON array of wire records.
pub fn from_json_deltas(v: &Value) -> Result<Vec<Delta>, RevelationError> {
    let arr = v
        .as_array()
        .ok_or_else(|| invalid("Deltas must be an array."))?;
    arr.iter().map(from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PATH_FIRST_NOT_STRING, PATH_NOT_ARRAY, VALUE_MISSING, VALUE_NOT_STRING};
    use crate::path::PathStep;
    use serde_json::json;

    #[test]
    fn encodes_set_record() {
        let d = Delta::Set {
            path: vec![PathStep::Key("x".into()), PathStep::Key("y".into())],
            value: json!("v"),
        };
        assert_eq!(to_json(&d), json!({"Operation": "Set", "Path": ["x", "y"], "Value": "v"}));
    }

    #[test]
    fn encodes_payload_less_record_without_value() {
        let d = Delta::DeleteLast { path: vec![PathStep::Key("a".into()), PathStep::Index(0)] };
        assert_eq!(to_json(&d), json!({"Operation": "DeleteLast", "Path": ["a", 0]}));
    }

    #[test]
    fn decodes_every_operation() {
        let log = json!([
            {"Operation": "Set", "Path": ["a"], "Value": {"b": [1]}},
            {"Operation": "Delete", "Path": ["a", "b"]},
            {"Operation": "DeleteValue", "Path": [], "Value": 1},
            {"Operation": "Prepend", "Path": ["s"], "Value": "x"},
            {"Operation": "Append", "Path": ["s"], "Value": "y"},
            {"Operation": "Increment", "Path": ["n"], "Value": 2},
            {"Operation": "Decrement", "Path": ["n"], "Value": 0.5},
            {"Operation": "Toggle", "Path": ["t"]},
            {"Operation": "InsertFirst", "Path": ["l"], "Value": null},
            {"Operation": "InsertLast", "Path": ["l"], "Value": [1]},
            {"Operation": "InsertBefore", "Path": ["l", 0], "Value": true},
            {"Operation": "InsertAfter", "Path": ["l", 1], "Value": "z"},
            {"Operation": "DeleteFirst", "Path": ["l"]},
            {"Operation": "DeleteLast", "Path": ["l"]}
        ]);
        let deltas = from_json_deltas(&log).unwrap();
        assert_eq!(deltas.len(), 14);
        assert_eq!(to_json_deltas(&deltas), log);
    }

    #[test]
    fn rejects_malformed_records() {
        let code = |v: Value| from_json(&v).unwrap_err().code();
        assert_eq!(code(json!([])), "INVALID_DELTA");
        assert_eq!(code(json!({"Path": ["a"]})), "INVALID_DELTA");
        assert_eq!(code(json!({"Operation": 1, "Path": ["a"]})), "INVALID_DELTA");
        assert_eq!(code(json!({"Operation": "Move", "Path": ["a"]})), "INVALID_DELTA");
        assert_eq!(code(json!({"Operation": "Toggle", "Path": ["a"], "Value": true})), "INVALID_DELTA");
        assert_eq!(code(json!({"Operation": "Toggle", "Path": ["a"], "Extra": 1})), "INVALID_DELTA");
    }

    #[test]
    fn runs_path_then_payload_checks() {
        assert_eq!(
            from_json(&json!({"Operation": "Set", "Value": 1})),
            Err(RevelationError::InvalidPath(PATH_NOT_ARRAY))
        );
        assert_eq!(
            from_json(&json!({"Operation": "Set", "Path": [0]})),
            Err(RevelationError::InvalidPath(PATH_FIRST_NOT_STRING))
        );
        assert_eq!(
            from_json(&json!({"Operation": "Set", "Path": ["a"]})),
            Err(RevelationError::InvalidValue(VALUE_MISSING))
        );
        assert_eq!(
            from_json(&json!({"Operation": "Append", "Path": ["a"], "Value": 3})),
            Err(RevelationError::InvalidValue(VALUE_NOT_STRING))
        );
    }

    #[test]
    fn enforces_root_policy() {
        let err = from_json(&json!({"Operation": "Set", "Path": [], "Value": [1]})).unwrap_err();
        assert_eq!(err.to_string(), "INVALID_VALUE: Can only write an object to the root.");
        let err = from_json(&json!({"Operation": "DeleteFirst", "Path": []})).unwrap_err();
        assert_eq!(err.to_string(), "INVALID_PATH: Cannot perform array operations on the root.");
    }

    #[test]
    fn rejects_non_array_log() {
        assert_eq!(from_json_deltas(&json!({})).unwrap_err().code(), "INVALID_DELTA");
    }
}
