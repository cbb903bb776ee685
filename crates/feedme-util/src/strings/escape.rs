/// Escape a string for embedding between JSON double quotes.
///
/// Produces exactly what `JSON.stringify` emits for the string body:
/// - `"` and `\` are backslash-escaped
/// - `\b`, `\t`, `\n`, `\f`, `\r` use their short forms
/// - every other control character below U+0020 becomes `\u00xx`
///   (lowercase hex)
/// - everything else, including non-ASCII, is copied through
///
/// # Examples
///
/// ```
/// use feedme_util::strings::escape;
///
/// assert_eq!(escape("hello"), "hello");
/// assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
/// assert_eq!(escape("line1\nline2"), "line1\\nline2");
/// assert_eq!(escape("\u{001f}"), "\\u001f");
/// ```
pub fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for (i, ch) in s.char_indices() {
        let escaped: Option<String> = match ch {
            '"' => Some("\\\"".into()),
            '\\' => Some("\\\\".into()),
            '\u{0008}' => Some("\\b".into()),
            '\t' => Some("\\t".into()),
            '\n' => Some("\\n".into()),
            '\u{000C}' => Some("\\f".into()),
            '\r' => Some("\\r".into()),
            c if (c as u32) < 0x20 => Some(format!("\\u{:04x}", c as u32)),
            _ => None,
        };

        if let Some(esc) = escaped {
            result.push_str(&s[last..i]);
            result.push_str(&esc);
            last = i + ch.len_utf8();
        }
    }

    result.push_str(&s[last..]);
    result
}
