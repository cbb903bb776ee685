//! Canonical digest of feed data.
//!
//! `base64(md5(stringify(value)))`: the same string for structurally equal
//! documents regardless of key insertion order, and the same string any
//! other Feedme peer computes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::{Digest, Md5};
use serde_json::Value;

use crate::stable::stringify;

/// Hash a document.
///
/// ```
/// use serde_json::json;
///
/// assert_eq!(feedme_delta::hash(&json!({"member": "myval"})), "2vD60QUu+6QYUPOIEvbbPg==");
/// ```
pub fn hash(value: &Value) -> String {
    STANDARD.encode(Md5::digest(stringify(value).as_bytes()))
}
