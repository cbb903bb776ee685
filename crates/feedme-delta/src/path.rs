//! Delta paths.
//!
//! A path is a sequence of locators into feed data. The empty path is the
//! root. The first locator, if present, is a top-level key; every later one
//! is either an object key or an array index.

use std::fmt;

use serde_json::{Number, Value};

use crate::error::{RevelationError, PATH_FIRST_NOT_STRING, PATH_LATER_INVALID, PATH_NOT_ARRAY};
use crate::value::InputValue;

/// One locator in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Key(String),
    Index(usize),
    /// A legal index no in-memory array can reach, such as `1e21`. It
    /// validates and travels on the wire, but never resolves on apply.
    OutOfRange(Number),
}

impl PathStep {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathStep::Key(k) => Some(k),
            PathStep::Index(_) | PathStep::OutOfRange(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathStep::Index(i) => Some(*i),
            PathStep::Key(_) | PathStep::OutOfRange(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PathStep::Key(k) => Value::String(k.clone()),
            PathStep::Index(i) => Value::Number((*i as u64).into()),
            PathStep::OutOfRange(n) => Value::Number(n.clone()),
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(k) => write!(f, "{k:?}"),
            PathStep::Index(i) => write!(f, "{i}"),
            PathStep::OutOfRange(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for PathStep {
    fn from(k: &str) -> Self {
        PathStep::Key(k.to_owned())
    }
}

impl From<String> for PathStep {
    fn from(k: String) -> Self {
        PathStep::Key(k)
    }
}

impl From<usize> for PathStep {
    fn from(i: usize) -> Self {
        PathStep::Index(i)
    }
}

/// A validated delta path. Empty means the root.
pub type Path = Vec<PathStep>;

/// Renders a path the way it travels on the wire, e.g. `["arr",1]`.
pub fn path_to_json(path: &[PathStep]) -> Value {
    Value::Array(path.iter().map(PathStep::to_json).collect())
}

/// Checks that `path` is a structurally legal locator sequence.
///
/// Rules, checked in order:
/// 1. it must be an array
/// 2. a first element, if present, must be a string
/// 3. every later element must be a string or a non-negative integer
///
/// Root restrictions are per operation and are not checked here.
///
/// ```
/// use feedme_delta::path::{validate_path, PathStep};
/// use serde_json::json;
///
/// let path = validate_path(&json!(["arr", 1]).into()).unwrap();
/// assert_eq!(path, vec![PathStep::Key("arr".into()), PathStep::Index(1)]);
/// assert!(validate_path(&json!([1]).into()).is_err());
/// ```
pub fn validate_path(path: &InputValue) -> Result<Path, RevelationError> {
    let InputValue::Array(steps) = path else {
        return Err(RevelationError::InvalidPath(PATH_NOT_ARRAY));
    };
    let steps = steps.borrow();
    let mut out = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let parsed = match step {
            InputValue::String(s) => Some(PathStep::Key(s.clone())),
            InputValue::Number(n) if i > 0 => index_step(n),
            _ => None,
        };
        match parsed {
            Some(p) => out.push(p),
            None if i == 0 => return Err(RevelationError::InvalidPath(PATH_FIRST_NOT_STRING)),
            None => return Err(RevelationError::InvalidPath(PATH_LATER_INVALID)),
        }
    }
    Ok(out)
}

/// A number is an index iff it is a finite, non-negative integral value.
/// `2.0` counts; `-1` and `1.5` do not. Indices past `usize` are kept as
/// [`PathStep::OutOfRange`].
fn index_step(n: &Number) -> Option<PathStep> {
    if let Some(u) = n.as_u64() {
        return Some(usize::try_from(u).map_or_else(|_| PathStep::OutOfRange(n.clone()), PathStep::Index));
    }
    if n.as_i64().is_some() {
        return None;
    }
    let f = n.as_f64()?;
    if !(f.is_finite() && f >= 0.0 && f.fract() == 0.0) {
        return None;
    }
    if f < usize::MAX as f64 {
        Some(PathStep::Index(f as usize))
    } else {
        Some(PathStep::OutOfRange(n.clone()))
    }
}
