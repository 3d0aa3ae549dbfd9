//! Key normalization for backend payloads
//!
//! The backend serializes snake_case JSON keys while the domain types
//! expect camelCase, so every payload is rewritten before decoding.
//! Normalization is idempotent: keys that are already camelCase pass
//! through unchanged, which keeps mixed payloads safe.

use serde_json::Value;

/// Recursively rewrites every object key in `value` to camelCase.
///
/// Arrays are walked element by element; scalars pass through untouched.
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter().map(|(key, inner)| (snake_to_camel(&key), camelize_keys(inner))).collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(camelize_keys).collect()),
        other => other,
    }
}

/// Converts one snake_case key to camelCase.
///
/// Leading underscores are part of the name, not separators, and are
/// kept verbatim.
fn snake_to_camel(key: &str) -> String {
    let stem = key.trim_start_matches('_');
    let prefix = &key[..key.len() - stem.len()];

    let mut out = String::with_capacity(key.len());
    out.push_str(prefix);
    let mut upper_next = false;
    for ch in stem.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
