//! The delta-log builder for one action on one feed.

use serde_json::{Map, Value};
use tracing::debug;

use crate::delta::{apply_mut, codec, Delta};
use crate::error::RevelationError;
use crate::hash::hash;
use crate::value::InputValue;

/// Describes how an action mutates one feed's data, as an ordered list of
/// deltas.
///
/// If old feed data is supplied, every delta is applied to a working copy as
/// it is recorded, so a delta that does not fit the data is rejected up
/// front and the resulting document can be hashed. Without old feed data the
/// deltas are still checked structurally.
///
/// Every operation method either records exactly one delta or returns an
/// error and changes nothing.
///
/// ```
/// use feedme_delta::ActionRevelation;
/// use serde_json::{json, Map};
///
/// let mut rev = ActionRevelation::new("f", Map::new(), Some(json!({"arr": [1, 2, 3]})));
/// rev.insert_before(json!(["arr", 1]), "v").unwrap();
/// assert_eq!(rev.new_feed_data().unwrap(), &json!({"arr": [1, "v", 2, 3]}));
/// ```
#[derive(Debug, Clone)]
pub struct ActionRevelation {
    feed_name: String,
    feed_args: Map<String, Value>,
    old_feed_data: Option<Value>,
    feed_deltas: Vec<Delta>,
    new_feed_data: Option<Value>,
}

impl ActionRevelation {
    pub fn new(
        feed_name: impl Into<String>,
        feed_args: Map<String, Value>,
        old_feed_data: Option<Value>,
    ) -> Self {
        let new_feed_data = old_feed_data.clone();
        Self {
            feed_name: feed_name.into(),
            feed_args,
            old_feed_data,
            feed_deltas: Vec::new(),
            new_feed_data,
        }
    }

    pub fn feed_name(&self) -> &str {
        &self.feed_name
    }

    pub fn feed_args(&self) -> &Map<String, Value> {
        &self.feed_args
    }

    pub fn old_feed_data(&self) -> Option<&Value> {
        self.old_feed_data.as_ref()
    }

    /// Recorded deltas, in call order.
    pub fn feed_deltas(&self) -> &[Delta] {
        &self.feed_deltas
    }

    /// The old feed data with every recorded delta applied.
    pub fn new_feed_data(&self) -> Result<&Value, RevelationError> {
        self.new_feed_data.as_ref().ok_or(RevelationError::NoFeedData)
    }

    /// Whether [`hash`](Self::hash) can succeed, i.e. old feed data was
    /// supplied.
    pub fn hashable(&self) -> bool {
        self.new_feed_data.is_some()
    }

    /// Canonical hash of the new feed data.
    pub fn hash(&self) -> Result<String, RevelationError> {
        self.new_feed_data().map(hash)
    }

    /// The revelation as it travels on the wire:
    /// `{FeedName, FeedArgs, FeedDeltas}`, plus `FeedMd5` when hashable.
    pub fn to_json(&self) -> Value {
        let mut m = Map::new();
        m.insert("FeedName".into(), Value::String(self.feed_name.clone()));
        m.insert("FeedArgs".into(), Value::Object(self.feed_args.clone()));
        m.insert("FeedDeltas".into(), codec::to_json_deltas(&self.feed_deltas));
        if let Some(doc) = &self.new_feed_data {
            m.insert("FeedMd5".into(), Value::String(hash(doc)));
        }
        Value::Object(m)
    }

    fn record(&mut self, op: &str, path: InputValue, value: InputValue) -> Result<(), RevelationError> {
        let result = Delta::build(op, &path, &value).and_then(|delta| {
            if let Some(doc) = self.new_feed_data.as_mut() {
                apply_mut(doc, &delta)?;
            }
            Ok(delta)
        });
        match result {
            Ok(delta) => {
                debug!(feed = %self.feed_name, operation = op, path = ?delta.path(), "delta recorded");
                self.feed_deltas.push(delta);
                Ok(())
            }
            Err(err) => {
                debug!(feed = %self.feed_name, operation = op, error = %err, "delta rejected");
                Err(err)
            }
        }
    }

    // ── Delta operations ──────────────────────────────────────────────────

    /// Assigns `value` at `path`. At the root `value` must be an object.
    pub fn set(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("Set", path.into(), value.into())
    }

    pub fn delete(&mut self, path: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("Delete", path.into(), InputValue::Undefined)
    }

    /// Removes every child of the container at `path` equal to `value`.
    pub fn delete_value(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("DeleteValue", path.into(), value.into())
    }

    pub fn prepend(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("Prepend", path.into(), value.into())
    }

    pub fn append(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("Append", path.into(), value.into())
    }

    pub fn increment(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("Increment", path.into(), value.into())
    }

    pub fn decrement(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("Decrement", path.into(), value.into())
    }

    pub fn toggle(&mut self, path: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("Toggle", path.into(), InputValue::Undefined)
    }

    pub fn insert_first(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("InsertFirst", path.into(), value.into())
    }

    pub fn insert_last(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("InsertLast", path.into(), value.into())
    }

    /// Inserts before the array element the final path locator names.
    pub fn insert_before(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("InsertBefore", path.into(), value.into())
    }

    /// Inserts after the array element the final path locator names.
    pub fn insert_after(&mut self, path: impl Into<InputValue>, value: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("InsertAfter", path.into(), value.into())
    }

    pub fn delete_first(&mut self, path: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("DeleteFirst", path.into(), InputValue::Undefined)
    }

    pub fn delete_last(&mut self, path: impl Into<InputValue>) -> Result<(), RevelationError> {
        self.record("DeleteLast", path.into(), InputValue::Undefined)
    }
}
