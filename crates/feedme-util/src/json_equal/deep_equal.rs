use serde_json::{Number, Value};

/// Performs a structural equality check between two JSON values.
///
/// - Objects are equal when they hold the same set of keys with pairwise
///   equal members. Key order is ignored.
/// - Arrays are equal when they have the same length and are pairwise
///   equal in order.
/// - Numbers compare by numeric value, so `1` and `1.0` are equal.
/// - Values of different types are never equal.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use feedme_util::json_equal::deep_equal;
///
/// let a = json!({"foo": [1, 2, 3], "bar": null});
/// let b = json!({"bar": null, "foo": [1, 2, 3]});
/// let c = json!({"foo": [1, 2, 4], "bar": null});
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => number_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,

        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len()
                && arr_a.iter().zip(arr_b).all(|(x, y)| deep_equal(x, y))
        }

        (Value::Object(obj_a), Value::Object(obj_b)) => {
            if obj_a.len() != obj_b.len() {
                return false;
            }
            obj_a.iter().all(|(key, val_a)| match obj_b.get(key) {
                Some(val_b) => deep_equal(val_a, val_b),
                None => false,
            })
        }

        _ => false,
    }
}

/// Compares two JSON numbers by value.
///
/// Integers are compared exactly; anything involving a float falls back to
/// `f64` comparison.
pub fn number_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
