#![allow(dead_code)]

use feedme_delta::{delta::codec, ActionRevelation, RevelationError};
use serde_json::{json, Map, Value};

pub const NON_EXISTENT: &str =
    "INVALID_OPERATION: Path references a non-existent location in the feed data.";

pub fn feed_args() -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("feed".into(), json!("args"));
    m
}

/// A revelation tracking `doc`.
pub fn tracked(doc: Value) -> ActionRevelation {
    ActionRevelation::new("someFeed", feed_args(), Some(doc))
}

/// A revelation with no old feed data.
pub fn untracked() -> ActionRevelation {
    ActionRevelation::new("someFeed", feed_args(), None)
}

/// The recorded deltas as their wire records.
pub fn wire_deltas(rev: &ActionRevelation) -> Value {
    codec::to_json_deltas(rev.feed_deltas())
}

pub fn message(result: Result<(), RevelationError>) -> String {
    match result {
        Ok(()) => panic!("expected an error"),
        Err(e) => e.to_string(),
    }
}
