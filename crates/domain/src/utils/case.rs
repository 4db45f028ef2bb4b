//! Key case conversion for upstream payloads

use serde_json::{Map, Value};

/// Convert a `snake_case`, `kebab-case` or space separated identifier to
/// `camelCase`. Identifiers that are already camel case are left untouched
/// apart from the first letter being lowered.
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (index, word) in input.split(['_', '-', ' ']).filter(|w| !w.is_empty()).enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if index == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }

    out
}

/// Recursively rename every object key with [`to_camel_case`].
pub fn keys_to_camel_case(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, inner)| (to_camel_case(&key), keys_to_camel_case(inner)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(keys_to_camel_case).collect()),
        other => other,
    }
}
