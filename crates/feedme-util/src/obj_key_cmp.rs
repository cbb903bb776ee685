use std::cmp::Ordering;

/// Compare two object keys for canonical serialization.
///
/// Keys are ordered by their UTF-16 code units, which is the order
/// JavaScript's default `Array.prototype.sort` gives `Object.keys`. Byte
/// order and UTF-16 order agree except when a supplementary-plane character
/// (a surrogate pair) meets a BMP character at or above U+E000.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use feedme_util::obj_key_cmp::obj_key_cmp;
///
/// assert_eq!(obj_key_cmp("a", "b"), Ordering::Less);
/// assert_eq!(obj_key_cmp("aa", "b"), Ordering::Less);
/// assert_eq!(obj_key_cmp("Z", "a"), Ordering::Less);
/// assert_eq!(obj_key_cmp("a", "a"), Ordering::Equal);
/// ```
pub fn obj_key_cmp(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}
