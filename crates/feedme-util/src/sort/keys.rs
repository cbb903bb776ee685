use serde_json::{Map, Value};

use crate::obj_key_cmp::obj_key_cmp;

/// Returns the keys of `map` in canonical order (see [`obj_key_cmp`]).
///
/// ```
/// use feedme_util::sort::sorted_keys;
///
/// let v = serde_json::json!({"b": 1, "a": 2, "B": 3});
/// let keys = sorted_keys(v.as_object().unwrap());
/// assert_eq!(keys, vec!["B", "a", "b"]);
/// ```
pub fn sorted_keys(map: &Map<String, Value>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_by(|a, b| obj_key_cmp(a, b));
    keys
}
