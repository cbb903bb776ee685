//! Delta apply logic.
//!
//! [`apply_mut`] runs every check a delta needs before touching the
//! document, then performs a single mutation. A failed delta therefore
//! leaves the document exactly as it was.

use feedme_util::deep_equal;
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::trace;

use super::types::Delta;
use crate::path::PathStep;
use crate::stable::MAX_SAFE_INTEGER;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// An intermediate container, key or index does not exist.
    #[error("Path references a non-existent location in the feed data.")]
    NotFound,
    /// The value at the location has the wrong type for the operation.
    #[error("Path references a non-existent location in the feed data.")]
    InvalidTarget,
    /// The final locator is not a usable index for the operation.
    #[error("Path references a non-existent location in the feed data.")]
    InvalidIndex,
    #[error("Operation would produce a non-finite number.")]
    NonFiniteNumber,
}

/// Options for [`apply_deltas`].
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// If true, deltas are applied in place with no per-delta snapshots.
    /// If false, the document after every delta is captured in
    /// [`ReplayResult::steps`].
    pub mutate: bool,
}

/// Final document plus, unless replayed with `mutate`, the document as it
/// stood after each delta.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayResult {
    pub doc: Value,
    pub steps: Vec<Value>,
}

// ── Path navigation ───────────────────────────────────────────────────────

fn step_mut<'a>(container: &'a mut Value, step: &PathStep) -> Result<&'a mut Value, ApplyError> {
    match (container, step) {
        (Value::Object(map), PathStep::Key(k)) => map.get_mut(k).ok_or(ApplyError::NotFound),
        (Value::Array(arr), PathStep::Index(i)) => arr.get_mut(*i).ok_or(ApplyError::NotFound),
        _ => Err(ApplyError::NotFound),
    }
}

/// Mutable navigation to the value at `path` (must exist).
fn get_mut_at<'a>(doc: &'a mut Value, path: &[PathStep]) -> Result<&'a mut Value, ApplyError> {
    path.iter().try_fold(doc, |node, step| step_mut(node, step))
}

/// Splits `path` into the parent container and the final locator.
fn parent_mut<'a, 'p>(
    doc: &'a mut Value,
    path: &'p [PathStep],
) -> Result<(&'a mut Value, &'p PathStep), ApplyError> {
    let (last, parent_path) = path.split_last().ok_or(ApplyError::InvalidTarget)?;
    Ok((get_mut_at(doc, parent_path)?, last))
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_set(doc: &mut Value, path: &[PathStep], value: Value) -> Result<(), ApplyError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, last) = parent_mut(doc, path)?;
    match (parent, last) {
        (Value::Object(map), PathStep::Key(k)) => {
            map.insert(k.clone(), value);
            Ok(())
        }
        (Value::Array(arr), PathStep::Index(i)) => {
            let slot = arr.get_mut(*i).ok_or(ApplyError::InvalidIndex)?;
            *slot = value;
            Ok(())
        }
        _ => Err(ApplyError::InvalidTarget),
    }
}

fn apply_delete(doc: &mut Value, path: &[PathStep]) -> Result<(), ApplyError> {
    let (parent, last) = parent_mut(doc, path)?;
    match (parent, last) {
        (Value::Object(map), PathStep::Key(k)) => {
            // `shift_remove` keeps the remaining members in insertion order.
            map.shift_remove(k).map(drop).ok_or(ApplyError::NotFound)
        }
        (Value::Array(arr), PathStep::Index(i)) => {
            if *i >= arr.len() {
                return Err(ApplyError::InvalidIndex);
            }
            arr.remove(*i);
            Ok(())
        }
        _ => Err(ApplyError::InvalidTarget),
    }
}

fn apply_delete_value(doc: &mut Value, path: &[PathStep], value: &Value) -> Result<(), ApplyError> {
    match get_mut_at(doc, path)? {
        Value::Object(map) => {
            map.retain(|_, v| !deep_equal(v, value));
            Ok(())
        }
        Value::Array(arr) => {
            arr.retain(|v| !deep_equal(v, value));
            Ok(())
        }
        _ => Err(ApplyError::InvalidTarget),
    }
}

fn apply_concat(doc: &mut Value, path: &[PathStep], s: &str, prepend: bool) -> Result<(), ApplyError> {
    match get_mut_at(doc, path)? {
        Value::String(existing) => {
            if prepend {
                existing.insert_str(0, s);
            } else {
                existing.push_str(s);
            }
            Ok(())
        }
        _ => Err(ApplyError::InvalidTarget),
    }
}

/// Adds `delta` (negated when `subtract`) to `current` with JavaScript
/// number semantics.
///
/// Safe integers (|n| <= 2^53 - 1) add exactly. Anything else is computed in
/// `f64`, and an integral result in the safe range is stored as an integer
/// again.
fn add_numbers(current: &Number, delta: &Number, subtract: bool) -> Result<Number, ApplyError> {
    if let (Some(a), Some(b)) = (safe_integer(current), safe_integer(delta)) {
        let exact = if subtract { a - b } else { a + b };
        if exact.unsigned_abs() <= MAX_SAFE_INTEGER {
            return Ok(exact.into());
        }
    }
    let a = current.as_f64().ok_or(ApplyError::InvalidTarget)?;
    let b = delta.as_f64().ok_or(ApplyError::InvalidTarget)?;
    let result = if subtract { a - b } else { a + b };
    if result.fract() == 0.0 && result.abs() <= MAX_SAFE_INTEGER as f64 {
        return Ok((result as i64).into());
    }
    Number::from_f64(result).ok_or(ApplyError::NonFiniteNumber)
}

fn safe_integer(n: &Number) -> Option<i64> {
    n.as_i64().filter(|i| i.unsigned_abs() <= MAX_SAFE_INTEGER)
}

fn apply_arith(doc: &mut Value, path: &[PathStep], by: &Number, subtract: bool) -> Result<(), ApplyError> {
    match get_mut_at(doc, path)? {
        Value::Number(n) => {
            *n = add_numbers(n, by, subtract)?;
            Ok(())
        }
        _ => Err(ApplyError::InvalidTarget),
    }
}

fn apply_toggle(doc: &mut Value, path: &[PathStep]) -> Result<(), ApplyError> {
    match get_mut_at(doc, path)? {
        Value::Bool(b) => {
            *b = !*b;
            Ok(())
        }
        _ => Err(ApplyError::InvalidTarget),
    }
}

fn target_array<'a>(doc: &'a mut Value, path: &[PathStep]) -> Result<&'a mut Vec<Value>, ApplyError> {
    match get_mut_at(doc, path)? {
        Value::Array(arr) => Ok(arr),
        _ => Err(ApplyError::InvalidTarget),
    }
}

/// Inserts next to the element the final locator names. `offset` is 0 for
/// before, 1 for after.
fn apply_insert_adjacent(
    doc: &mut Value,
    path: &[PathStep],
    value: Value,
    offset: usize,
) -> Result<(), ApplyError> {
    let (parent, last) = parent_mut(doc, path)?;
    let Value::Array(arr) = parent else {
        return Err(ApplyError::InvalidTarget);
    };
    let idx = last.as_index().ok_or(ApplyError::InvalidIndex)?;
    if idx >= arr.len() {
        return Err(ApplyError::InvalidIndex);
    }
    arr.insert(idx + offset, value);
    Ok(())
}

// ── Main apply functions ──────────────────────────────────────────────────

/// Applies one delta to `doc` in place.
///
/// Either the delta fully applies or `doc` is left untouched.
pub fn apply_mut(doc: &mut Value, delta: &Delta) -> Result<(), ApplyError> {
    trace!(operation = delta.op_name(), depth = delta.path().len(), "applying delta");
    match delta {
        Delta::Set { path, value } => apply_set(doc, path, value.clone()),
        Delta::Delete { path } => apply_delete(doc, path),
        Delta::DeleteValue { path, value } => apply_delete_value(doc, path, value),
        Delta::Prepend { path, value } => apply_concat(doc, path, value, true),
        Delta::Append { path, value } => apply_concat(doc, path, value, false),
        Delta::Increment { path, value } => apply_arith(doc, path, value, false),
        Delta::Decrement { path, value } => apply_arith(doc, path, value, true),
        Delta::Toggle { path } => apply_toggle(doc, path),
        Delta::InsertFirst { path, value } => {
            target_array(doc, path)?.insert(0, value.clone());
            Ok(())
        }
        Delta::InsertLast { path, value } => {
            target_array(doc, path)?.push(value.clone());
            Ok(())
        }
        Delta::InsertBefore { path, value } => apply_insert_adjacent(doc, path, value.clone(), 0),
        Delta::InsertAfter { path, value } => apply_insert_adjacent(doc, path, value.clone(), 1),
        Delta::DeleteFirst { path } => {
            let arr = target_array(doc, path)?;
            if arr.is_empty() {
                return Err(ApplyError::NotFound);
            }
            arr.remove(0);
            Ok(())
        }
        Delta::DeleteLast { path } => target_array(doc, path)?
            .pop()
            .map(drop)
            .ok_or(ApplyError::NotFound),
    }
}

/// Applies one delta and returns the successor document. `doc` is not
/// modified.
pub fn apply(doc: &Value, delta: &Delta) -> Result<Value, ApplyError> {
    let mut next = doc.clone();
    apply_mut(&mut next, delta)?;
    Ok(next)
}

/// Replays a delta log against `doc`, in order.
pub fn apply_deltas(doc: Value, deltas: &[Delta], options: &ApplyOptions) -> Result<ReplayResult, ApplyError> {
    let mut working = doc;
    if options.mutate {
        for delta in deltas {
            apply_mut(&mut working, delta)?;
        }
        return Ok(ReplayResult { doc: working, steps: vec![] });
    }
    let mut steps = Vec::with_capacity(deltas.len());
    for delta in deltas {
        apply_mut(&mut working, delta)?;
        steps.push(working.clone());
    }
    Ok(ReplayResult { doc: working, steps })
}

// ── Tests ─────────────────────────────────────────────────────────────────
