//! Key casing for request bodies
//!
//! Callers may build attribute maps with Rust-style `snake_case` keys. The
//! API expects `camelCase`, so the top-level keys of outgoing objects are
//! converted. Nested values are left alone.

use serde_json::{Map, Value};

/// `oob_channel` -> `oobChannel`
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, part) in key.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Convert the top-level keys of a JSON object to camelCase
///
/// Anything that is not an object is returned unchanged.
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (snake_to_camel(&key), val))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}
