//! The delta enum and the per-operation root policy table.

use serde_json::{Number, Value};

use crate::error::{RevelationError, VALUE_NOT_NUMBER, VALUE_NOT_STRING, VALUE_ROOT_NOT_OBJECT};
use crate::path::{validate_path, Path};
use crate::value::{validate_json_value, InputValue};

/// One atomic feed-data mutation.
///
/// Payload types are already narrowed: string operations carry a `String`,
/// numeric ones a `Number`, the rest an arbitrary JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    Set { path: Path, value: Value },
    Delete { path: Path },
    DeleteValue { path: Path, value: Value },
    Prepend { path: Path, value: String },
    Append { path: Path, value: String },
    Increment { path: Path, value: Number },
    Decrement { path: Path, value: Number },
    Toggle { path: Path },
    InsertFirst { path: Path, value: Value },
    InsertLast { path: Path, value: Value },
    InsertBefore { path: Path, value: Value },
    InsertAfter { path: Path, value: Value },
    DeleteFirst { path: Path },
    DeleteLast { path: Path },
}

/// What an operation may do to the root (the empty path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootPolicy {
    Allowed,
    /// Allowed only with an object payload, so the root stays an object.
    ObjectOnly,
    /// Never allowed; carries the family-specific message.
    Rejected(&'static str),
}

pub const ROOT_DELETE: &str = "Cannot delete the root.";
pub const ROOT_STRING: &str = "Cannot perform string operations on the root.";
pub const ROOT_NUMBER: &str = "Cannot perform number operations on the root.";
pub const ROOT_BOOLEAN: &str = "Cannot perform boolean operations on the root.";
pub const ROOT_ARRAY: &str = "Cannot perform array operations on the root.";

/// Operation names as they appear in the `Operation` member on the wire.
pub const OPERATION_NAMES: [&str; 14] = [
    "Set",
    "Delete",
    "DeleteValue",
    "Prepend",
    "Append",
    "Increment",
    "Decrement",
    "Toggle",
    "InsertFirst",
    "InsertLast",
    "InsertBefore",
    "InsertAfter",
    "DeleteFirst",
    "DeleteLast",
];

/// True for operations whose record carries a `Value` member.
pub fn carries_payload(op: &str) -> bool {
    !matches!(op, "Delete" | "Toggle" | "DeleteFirst" | "DeleteLast")
}

fn string_payload(value: &InputValue) -> Result<String, RevelationError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(RevelationError::InvalidValue(VALUE_NOT_STRING))
}

fn number_payload(value: &InputValue) -> Result<Number, RevelationError> {
    value
        .as_number()
        .cloned()
        .ok_or(RevelationError::InvalidValue(VALUE_NOT_NUMBER))
}

impl Delta {
    /// Builds a delta from an operation name and unchecked arguments.
    ///
    /// Checks run path first, then payload, then root policy; the first
    /// failure is returned. `value` is ignored by payload-less operations.
    pub fn build(op: &str, path: &InputValue, value: &InputValue) -> Result<Delta, RevelationError> {
        let unknown = || RevelationError::InvalidDelta(format!("Unknown operation \"{op}\"."));
        if !OPERATION_NAMES.contains(&op) {
            return Err(unknown());
        }
        let path = validate_path(path)?;
        let delta = match op {
            "Set" => Delta::Set { path, value: validate_json_value(value)? },
            "Delete" => Delta::Delete { path },
            "DeleteValue" => Delta::DeleteValue { path, value: validate_json_value(value)? },
            "Prepend" => Delta::Prepend { path, value: string_payload(value)? },
            "Append" => Delta::Append { path, value: string_payload(value)? },
            "Increment" => Delta::Increment { path, value: number_payload(value)? },
            "Decrement" => Delta::Decrement { path, value: number_payload(value)? },
            "Toggle" => Delta::Toggle { path },
            "InsertFirst" => Delta::InsertFirst { path, value: validate_json_value(value)? },
            "InsertLast" => Delta::InsertLast { path, value: validate_json_value(value)? },
            "InsertBefore" => Delta::InsertBefore { path, value: validate_json_value(value)? },
            "InsertAfter" => Delta::InsertAfter { path, value: validate_json_value(value)? },
            "DeleteFirst" => Delta::DeleteFirst { path },
            "DeleteLast" => Delta::DeleteLast { path },
            _ => return Err(unknown()),
        };
        delta.check_root()?;
        Ok(delta)
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            Delta::Set { .. } => "Set",
            Delta::Delete { .. } => "Delete",
            Delta::DeleteValue { .. } => "DeleteValue",
            Delta::Prepend { .. } => "Prepend",
            Delta::Append { .. } => "Append",
            Delta::Increment { .. } => "Increment",
            Delta::Decrement { .. } => "Decrement",
            Delta::Toggle { .. } => "Toggle",
            Delta::InsertFirst { .. } => "InsertFirst",
            Delta::InsertLast { .. } => "InsertLast",
            Delta::InsertBefore { .. } => "InsertBefore",
            Delta::InsertAfter { .. } => "InsertAfter",
            Delta::DeleteFirst { .. } => "DeleteFirst",
            Delta::DeleteLast { .. } => "DeleteLast",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Delta::Set { path, .. }
            | Delta::Delete { path }
            | Delta::DeleteValue { path, .. }
            | Delta::Prepend { path, .. }
            | Delta::Append { path, .. }
            | Delta::Increment { path, .. }
            | Delta::Decrement { path, .. }
            | Delta::Toggle { path }
            | Delta::InsertFirst { path, .. }
            | Delta::InsertLast { path, .. }
            | Delta::InsertBefore { path, .. }
            | Delta::InsertAfter { path, .. }
            | Delta::DeleteFirst { path }
            | Delta::DeleteLast { path } => path,
        }
    }

    /// The payload as a JSON value, or `None` for payload-less operations.
    pub fn value(&self) -> Option<Value> {
        match self {
            Delta::Set { value, .. }
            | Delta::DeleteValue { value, .. }
            | Delta::InsertFirst { value, .. }
            | Delta::InsertLast { value, .. }
            | Delta::InsertBefore { value, .. }
            | Delta::InsertAfter { value, .. } => Some(value.clone()),
            Delta::Prepend { value, .. } | Delta::Append { value, .. } => {
                Some(Value::String(value.clone()))
            }
            Delta::Increment { value, .. } | Delta::Decrement { value, .. } => {
                Some(Value::Number(value.clone()))
            }
            Delta::Delete { .. }
            | Delta::Toggle { .. }
            | Delta::DeleteFirst { .. }
            | Delta::DeleteLast { .. } => None,
        }
    }

    pub fn root_policy(&self) -> RootPolicy {
        match self {
            Delta::Set { .. } => RootPolicy::ObjectOnly,
            Delta::DeleteValue { .. } => RootPolicy::Allowed,
            Delta::Delete { .. } => RootPolicy::Rejected(ROOT_DELETE),
            Delta::Prepend { .. } | Delta::Append { .. } => RootPolicy::Rejected(ROOT_STRING),
            Delta::Increment { .. } | Delta::Decrement { .. } => RootPolicy::Rejected(ROOT_NUMBER),
            Delta::Toggle { .. } => RootPolicy::Rejected(ROOT_BOOLEAN),
            Delta::InsertFirst { .. }
            | Delta::InsertLast { .. }
            | Delta::InsertBefore { .. }
            | Delta::InsertAfter { .. }
            | Delta::DeleteFirst { .. }
            | Delta::DeleteLast { .. } => RootPolicy::Rejected(ROOT_ARRAY),
        }
    }

    /// Enforces [`Delta::root_policy`] for this delta's path and payload.
    pub fn check_root(&self) -> Result<(), RevelationError> {
        if !self.path().is_empty() {
            return Ok(());
        }
        match self.root_policy() {
            RootPolicy::Allowed => Ok(()),
            RootPolicy::ObjectOnly => match self {
                Delta::Set { value: Value::Object(_), .. } => Ok(()),
                _ => Err(RevelationError::InvalidValue(VALUE_ROOT_NOT_OBJECT)),
            },
            RootPolicy::Rejected(msg) => Err(RevelationError::InvalidPath(msg)),
        }
    }
}
