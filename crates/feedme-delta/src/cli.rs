//! Core logic behind the `feed-delta` binary.
//!
//! Replays a delta log (or a whole revelation message) against a feed-data
//! document and prints the result or its canonical hash.

use std::fs;

use serde_json::Value;
use thiserror::Error;

use crate::delta::codec;
use crate::error::RevelationError;
use crate::hash::hash;
use crate::message::RevelationMessage;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Revelation(#[from] RevelationError),
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What to print once the deltas are replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Compact,
    Pretty,
    Hash,
}

// ── Input ─────────────────────────────────────────────────────────────────

/// Resolves a `JSON|@file` argument to its JSON text.
pub fn load_arg(arg: &str) -> Result<String, CliError> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        }),
        None => Ok(arg.to_owned()),
    }
}

// ── Replay ────────────────────────────────────────────────────────────────

/// Replays `deltas` against `doc`.
///
/// `deltas` is either a JSON array of delta records or a revelation message
/// object. A message's `FeedMd5` is verified unless `expect_hash` overrides
/// it.
pub fn replay(doc: &str, deltas: &str, expect_hash: Option<&str>) -> Result<Value, CliError> {
    let doc: Value = serde_json::from_str(doc)?;
    let deltas: Value = serde_json::from_str(deltas)?;
    let mut msg = if deltas.is_object() {
        RevelationMessage::from_json(&deltas)?
    } else {
        RevelationMessage {
            feed_name: String::new(),
            feed_args: Default::default(),
            feed_deltas: codec::from_json_deltas(&deltas)?,
            feed_md5: None,
        }
    };
    if let Some(expected) = expect_hash {
        msg.feed_md5 = Some(expected.to_owned());
    }
    Ok(msg.replay(&doc)?)
}

pub fn render(doc: &Value, output: Output) -> Result<String, CliError> {
    Ok(match output {
        Output::Compact => serde_json::to_string(doc)?,
        Output::Pretty => serde_json::to_string_pretty(doc)?,
        Output::Hash => hash(doc),
    })
}
