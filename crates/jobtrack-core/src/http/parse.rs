//! Pull error details and headers out of raw responses.

use serde_json::Value;

/// Value of the first header named `name` (case-insensitive).
pub(super) fn header_value(lines: &[String], name: &str) -> Option<String> {
    lines.iter().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        if k.trim().eq_ignore_ascii_case(name) {
            Some(v.trim().to_string())
        } else {
            None
        }
    })
}

/// Human-readable error from a JSON error body: `error`, then `detail`,
/// then `message`. Validation-style `detail` arrays are joined by their `msg`.
pub(super) fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["error", "detail", "message"]
        .iter()
        .filter_map(|key| value.get(key))
        .find_map(describe)
}

fn describe(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        Value::Object(map) => map.get("message").and_then(describe),
        _ => None,
    }
}
