//! Error taxonomy shared by every entry point of the engine.
//!
//! Display strings keep the `CODE: message` shape peers already match on.

use thiserror::Error;

use crate::delta::ApplyError;

pub const PATH_NOT_ARRAY: &str = "Path must be an array.";
pub const PATH_FIRST_NOT_STRING: &str = "First path element must be a string if present.";
pub const PATH_LATER_INVALID: &str =
    "Second and later path elements must be strings or non-negative integers.";

pub const VALUE_CIRCULAR: &str = "Circular reference present. Must be a JSON-expressible value.";
pub const VALUE_MISSING: &str = "Must specify a JSON-expressible value.";
pub const VALUE_UNDEFINED: &str = "Undefined value present. Must be a JSON-expressible value.";
pub const VALUE_NOT_STRING: &str = "String value required.";
pub const VALUE_NOT_NUMBER: &str = "Numeric value required.";
pub const VALUE_ROOT_NOT_OBJECT: &str = "Can only write an object to the root.";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RevelationError {
    /// The path is not a legal locator sequence or breaks a root policy.
    #[error("INVALID_PATH: {0}")]
    InvalidPath(&'static str),
    /// The payload is missing, not JSON-expressible, or of the wrong type.
    #[error("INVALID_VALUE: {0}")]
    InvalidValue(&'static str),
    /// The delta does not fit the tracked feed data.
    #[error("INVALID_OPERATION: {0}")]
    InvalidOperation(#[from] ApplyError),
    #[error("NO_FEED_DATA: Old feed data was not supplied.")]
    NoFeedData,
    /// A wire-level delta or message is malformed.
    #[error("INVALID_DELTA: {0}")]
    InvalidDelta(String),
    /// Replayed feed data does not match the hash that accompanied it.
    #[error("HASH_MISMATCH: Expected {expected}, computed {actual}.")]
    HashMismatch { expected: String, actual: String },
}

impl RevelationError {
    /// The protocol error code, i.e. the part of the message before the colon.
    pub fn code(&self) -> &'static str {
        match self {
            RevelationError::InvalidPath(_) => "INVALID_PATH",
            RevelationError::InvalidValue(_) => "INVALID_VALUE",
            RevelationError::InvalidOperation(_) => "INVALID_OPERATION",
            RevelationError::NoFeedData => "NO_FEED_DATA",
            RevelationError::InvalidDelta(_) => "INVALID_DELTA",
            RevelationError::HashMismatch { .. } => "HASH_MISMATCH",
        }
    }
}
