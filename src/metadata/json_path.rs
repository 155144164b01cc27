use serde_json::Value;

// @module: Tolerant access into loosely typed JSON

/// Follow `path` through nested objects.
///
/// Returns `None` as soon as a key is missing or an intermediate value is not
/// an object; never panics on foreign input.
pub fn value_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |node, key| node.as_object()?.get(*key))
}

/// Like `value_at`, but only yields non-empty strings
pub fn str_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    value_at(root, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Script-style truthiness: null, false, 0, NaN and "" are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Shorten text for log output without splitting a character
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
