//! Receiving side of an action revelation.
//!
//! A subscriber gets `{FeedName, FeedArgs, FeedDeltas, FeedMd5?}`, replays
//! the deltas against the feed data it already holds and, when a hash came
//! along, checks that it arrived at the same document as the server.

use serde_json::{Map, Value};
use tracing::debug;

use crate::delta::{apply_deltas, codec, ApplyOptions, Delta};
use crate::error::RevelationError;
use crate::hash::hash;
use crate::revelation::ActionRevelation;

/// A decoded action-revelation message.
#[derive(Debug, Clone, PartialEq)]
pub struct RevelationMessage {
    pub feed_name: String,
    pub feed_args: Map<String, Value>,
    pub feed_deltas: Vec<Delta>,
    pub feed_md5: Option<String>,
}

fn invalid(msg: &str) -> RevelationError {
    RevelationError::InvalidDelta(msg.to_owned())
}

impl RevelationMessage {
    /// Decode and validate a message. Every delta must pass the same checks
    /// an [`ActionRevelation`] applies when recording it.
    pub fn from_json(v: &Value) -> Result<Self, RevelationError> {
        let obj = v
            .as_object()
            .ok_or_else(|| invalid("Message must be an object."))?;
        let feed_name = obj
            .get("FeedName")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("FeedName must be a string."))?
            .to_owned();
        let feed_args = obj
            .get("FeedArgs")
            .and_then(Value::as_object)
            .ok_or_else(|| invalid("FeedArgs must be an object."))?
            .clone();
        let feed_deltas = codec::from_json_deltas(
            obj.get("FeedDeltas")
                .ok_or_else(|| invalid("FeedDeltas must be an array."))?,
        )?;
        let feed_md5 = match obj.get("FeedMd5") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(invalid("FeedMd5 must be a string.")),
        };
        Ok(Self { feed_name, feed_args, feed_deltas, feed_md5 })
    }

    pub fn to_json(&self) -> Value {
        let mut m = Map::new();
        m.insert("FeedName".into(), Value::String(self.feed_name.clone()));
        m.insert("FeedArgs".into(), Value::Object(self.feed_args.clone()));
        m.insert("FeedDeltas".into(), codec::to_json_deltas(&self.feed_deltas));
        if let Some(md5) = &self.feed_md5 {
            m.insert("FeedMd5".into(), Value::String(md5.clone()));
        }
        Value::Object(m)
    }

    /// Applies the deltas to a copy of `base` and verifies `FeedMd5` against
    /// the result when present. `base` itself is left untouched.
    pub fn replay(&self, base: &Value) -> Result<Value, RevelationError> {
        let replayed = apply_deltas(base.clone(), &self.feed_deltas, &ApplyOptions { mutate: true })?;
        let doc = replayed.doc;
        if let Some(expected) = &self.feed_md5 {
            let actual = hash(&doc);
            if &actual != expected {
                debug!(feed = %self.feed_name, %expected, %actual, "replayed feed data hash mismatch");
                return Err(RevelationError::HashMismatch { expected: expected.clone(), actual });
            }
        }
        debug!(feed = %self.feed_name, deltas = self.feed_deltas.len(), "revelation replayed");
        Ok(doc)
    }
}

impl From<&ActionRevelation> for RevelationMessage {
    fn from(rev: &ActionRevelation) -> Self {
        Self {
            feed_name: rev.feed_name().to_owned(),
            feed_args: rev.feed_args().clone(),
            feed_deltas: rev.feed_deltas().to_vec(),
            feed_md5: rev.hash().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message() -> Value {
        json!({
            "FeedName": "f",
            "FeedArgs": {"a": "1"},
            "FeedDeltas": [{"Operation": "Set", "Path": ["member"], "Value": "myval"}],
            "FeedMd5": "2vD60QUu+6QYUPOIEvbbPg=="
        })
    }

    #[test]
    fn decodes_and_reencodes() {
        let msg = RevelationMessage::from_json(&message()).unwrap();
        assert_eq!(msg.feed_name, "f");
        assert_eq!(msg.feed_deltas.len(), 1);
        assert_eq!(msg.to_json(), message());
    }

    #[test]
    fn replay_verifies_hash() {
        let msg = RevelationMessage::from_json(&message()).unwrap();
        let base = json!({});
        assert_eq!(msg.replay(&base).unwrap(), json!({"member": "myval"}));
        assert_eq!(base, json!({}));
    }

    #[test]
    fn replay_detects_divergence() {
        let msg = RevelationMessage::from_json(&message()).unwrap();
        let err = msg.replay(&json!({"other": 1})).unwrap_err();
        assert_eq!(err.code(), "HASH_MISMATCH");
    }

    #[test]
    fn replay_without_hash_skips_verification() {
        let mut raw = message();
        raw.as_object_mut().unwrap().remove("FeedMd5");
        let msg = RevelationMessage::from_json(&raw).unwrap();
        assert_eq!(msg.replay(&json!({"other": 1})).unwrap(), json!({"other": 1, "member": "myval"}));
    }

    #[test]
    fn replay_reports_deltas_that_do_not_fit() {
        let msg = RevelationMessage::from_json(&json!({
            "FeedName": "f",
            "FeedArgs": {},
            "FeedDeltas": [{"Operation": "Toggle", "Path": ["missing"]}]
        }))
        .unwrap();
        assert_eq!(msg.replay(&json!({})).unwrap_err().code(), "INVALID_OPERATION");
    }

    #[test]
    fn rejects_malformed_messages() {
        let code = |v: Value| RevelationMessage::from_json(&v).unwrap_err().code();
        assert_eq!(code(json!([])), "INVALID_DELTA");
        assert_eq!(code(json!({"FeedArgs": {}, "FeedDeltas": []})), "INVALID_DELTA");
        assert_eq!(code(json!({"FeedName": "f", "FeedArgs": [], "FeedDeltas": []})), "INVALID_DELTA");
        assert_eq!(code(json!({"FeedName": "f", "FeedArgs": {}})), "INVALID_DELTA");
        assert_eq!(code(json!({"FeedName": "f", "FeedArgs": {}, "FeedDeltas": [], "FeedMd5": 5})), "INVALID_DELTA");
        assert_eq!(
            code(json!({"FeedName": "f", "FeedArgs": {}, "FeedDeltas": [{"Operation": "Delete", "Path": []}]})),
            "INVALID_PATH"
        );
    }

    #[test]
    fn from_revelation() {
        let mut rev = ActionRevelation::new("f", Map::new(), Some(json!({})));
        rev.set(json!(["member"]), "myval").unwrap();
        let msg = RevelationMessage::from(&rev);
        assert_eq!(msg.to_json(), rev.to_json());
        assert_eq!(msg.replay(&json!({})).unwrap(), json!({"member": "myval"}));
    }
}
