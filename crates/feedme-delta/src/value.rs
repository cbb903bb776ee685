//! Caller-supplied values and the JSON-expressibility checks run on them.
//!
//! Delta payloads arrive as [`InputValue`]s rather than `serde_json::Value`s
//! because a caller can hand over things JSON cannot express: a missing
//! argument ([`InputValue::Undefined`]), a container holding a missing
//! member, or a container that reaches itself through its own children.
//! Containers are shared (`Rc<RefCell<..>>`), so cloning an `InputValue`
//! clones a reference, not the contents. That is what makes diamonds and
//! true cycles representable, and what [`has_circular`] tells apart.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::error::{RevelationError, VALUE_CIRCULAR, VALUE_MISSING, VALUE_UNDEFINED};

pub type SharedArray = Rc<RefCell<Vec<InputValue>>>;
pub type SharedObject = Rc<RefCell<IndexMap<String, InputValue>>>;

/// A value as handed to an operation method, before validation.
#[derive(Clone, Default)]
pub enum InputValue {
    /// The missing marker. Distinct from `Null`.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(SharedArray),
    Object(SharedObject),
}

impl InputValue {
    pub fn undefined() -> Self {
        InputValue::Undefined
    }

    pub fn array(items: Vec<InputValue>) -> Self {
        InputValue::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, InputValue)>,
    {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        InputValue::Object(Rc::new(RefCell::new(map)))
    }

    pub fn empty_array() -> Self {
        Self::array(Vec::new())
    }

    pub fn empty_object() -> Self {
        Self::object(Vec::<(String, InputValue)>::new())
    }

    /// Appends to a shared array. Returns `false` if `self` is not an array.
    pub fn push(&self, item: InputValue) -> bool {
        match self {
            InputValue::Array(arr) => {
                arr.borrow_mut().push(item);
                true
            }
            _ => false,
        }
    }

    /// Inserts into a shared object. Returns `false` if `self` is not an object.
    pub fn insert(&self, key: impl Into<String>, item: InputValue) -> bool {
        match self {
            InputValue::Object(obj) => {
                obj.borrow_mut().insert(key.into(), item);
                true
            }
            _ => false,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, InputValue::Undefined)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, InputValue::Array(_) | InputValue::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            InputValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            InputValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Reference identity of a container; `None` for scalars.
    fn identity(&self) -> Option<*const ()> {
        match self {
            InputValue::Array(arr) => Some(Rc::as_ptr(arr) as *const ()),
            InputValue::Object(obj) => Some(Rc::as_ptr(obj) as *const ()),
            _ => None,
        }
    }

    /// Converts to a `serde_json::Value`, or `None` if a missing marker is
    /// reached anywhere. Must only be called on acyclic values.
    fn to_json(&self) -> Option<Value> {
        Some(match self {
            InputValue::Undefined => return None,
            InputValue::Null => Value::Null,
            InputValue::Bool(b) => Value::Bool(*b),
            InputValue::Number(n) => Value::Number(n.clone()),
            InputValue::String(s) => Value::String(s.clone()),
            InputValue::Array(arr) => Value::Array(
                arr.borrow()
                    .iter()
                    .map(InputValue::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            InputValue::Object(obj) => {
                let mut map = Map::new();
                for (k, v) in obj.borrow().iter() {
                    map.insert(k.clone(), v.to_json()?);
                }
                Value::Object(map)
            }
        })
    }
}

// Containers print shallowly so a cyclic value can still be debugged.
impl fmt::Debug for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Undefined => f.write_str("Undefined"),
            InputValue::Null => f.write_str("Null"),
            InputValue::Bool(b) => write!(f, "Bool({b})"),
            InputValue::Number(n) => write!(f, "Number({n})"),
            InputValue::String(s) => write!(f, "String({s:?})"),
            InputValue::Array(arr) => write!(f, "Array(len = {})", arr.borrow().len()),
            InputValue::Object(obj) => {
                let obj = obj.borrow();
                let keys: Vec<&String> = obj.keys().collect();
                write!(f, "Object(keys = {keys:?})")
            }
        }
    }
}

impl From<Value> for InputValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => InputValue::Null,
            Value::Bool(b) => InputValue::Bool(b),
            Value::Number(n) => InputValue::Number(n),
            Value::String(s) => InputValue::String(s),
            Value::Array(arr) => InputValue::array(arr.into_iter().map(InputValue::from).collect()),
            Value::Object(map) => {
                InputValue::object(map.into_iter().map(|(k, v)| (k, InputValue::from(v))))
            }
        }
    }
}

impl From<&Value> for InputValue {
    fn from(v: &Value) -> Self {
        InputValue::from(v.clone())
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::String(s.to_owned())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::String(s)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Bool(b)
    }
}

impl From<i64> for InputValue {
    fn from(n: i64) -> Self {
        InputValue::Number(n.into())
    }
}

impl From<i32> for InputValue {
    fn from(n: i32) -> Self {
        InputValue::Number(n.into())
    }
}

impl From<u64> for InputValue {
    fn from(n: u64) -> Self {
        InputValue::Number(n.into())
    }
}

impl From<usize> for InputValue {
    fn from(n: usize) -> Self {
        InputValue::Number((n as u64).into())
    }
}

impl From<Number> for InputValue {
    fn from(n: Number) -> Self {
        InputValue::Number(n)
    }
}

impl<T: Into<InputValue>> From<Option<T>> for InputValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(InputValue::Undefined, Into::into)
    }
}

impl<T: Into<InputValue>> From<Vec<T>> for InputValue {
    fn from(items: Vec<T>) -> Self {
        InputValue::array(items.into_iter().map(Into::into).collect())
    }
}

// ── Traversal state ────────────────────────────────────────────────────────

/// The chain of containers currently being descended into.
///
/// An immutable cons-list living on the call stack: each level of the
/// traversal pushes a node that points at its parent, so sibling branches
/// never see each other's entries.
#[derive(Debug, Clone, Copy)]
pub struct Ancestors<'a> {
    id: *const (),
    parent: Option<&'a Ancestors<'a>>,
}

impl Ancestors<'_> {
    fn contains(&self, id: *const ()) -> bool {
        let mut node = Some(self);
        while let Some(n) = node {
            if n.id == id {
                return true;
            }
            node = n.parent;
        }
        false
    }
}

/// Returns true iff `value` is a container that is reference-identical to
/// one of its own ancestors on the current traversal path, or contains such
/// a container at any depth.
///
/// Two references to the same sub-value from different branches (a
/// diamond) are not a cycle.
pub fn has_circular(value: &InputValue, ancestors: Option<&Ancestors<'_>>) -> bool {
    let Some(id) = value.identity() else {
        return false;
    };
    if ancestors.is_some_and(|chain| chain.contains(id)) {
        return true;
    }
    let here = Ancestors { id, parent: ancestors };
    match value {
        InputValue::Array(arr) => arr.borrow().iter().any(|child| has_circular(child, Some(&here))),
        InputValue::Object(obj) => obj.borrow().values().any(|child| has_circular(child, Some(&here))),
        _ => false,
    }
}

/// Returns true iff `value` is the missing marker or contains one as an
/// object member or array element at any depth.
///
/// Does not terminate on cyclic values; check [`has_circular`] first.
pub fn has_undefined(value: &InputValue) -> bool {
    match value {
        InputValue::Undefined => true,
        InputValue::Array(arr) => arr.borrow().iter().any(has_undefined),
        InputValue::Object(obj) => obj.borrow().values().any(has_undefined),
        _ => false,
    }
}

/// Checks that `value` is JSON-expressible and returns it as a
/// `serde_json::Value`.
///
/// Failures, first applicable wins:
/// 1. a circular reference anywhere in the value
/// 2. the value itself is missing
/// 3. a nested missing member
pub fn validate_json_value(value: &InputValue) -> Result<Value, RevelationError> {
    if has_circular(value, None) {
        return Err(RevelationError::InvalidValue(VALUE_CIRCULAR));
    }
    if value.is_undefined() {
        return Err(RevelationError::InvalidValue(VALUE_MISSING));
    }
    value
        .to_json()
        .ok_or(RevelationError::InvalidValue(VALUE_UNDEFINED))
}
