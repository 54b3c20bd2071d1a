//! Canonical JSON and content hashing for plan and step fingerprints.
//!
//! Object keys are emitted in sorted order so that logically equal values
//! hash equally regardless of insertion order. blake3 keeps fingerprints
//! cheap enough to compute per step.

use blake3::Hasher;
use serde_json::Value;
use std::collections::BTreeMap;

/// Serialize a JSON value with sorted object keys and no whitespace.
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap_or_default(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(to_canonical_json).collect();
            format!("[{}]", parts.join(","))
        }
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            let parts: Vec<String> = sorted
                .into_iter()
                .map(|(k, v)| {
                    format!(
                        "{}:{}",
                        serde_json::to_string(k).unwrap_or_default(),
                        to_canonical_json(v)
                    )
                })
                .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

/// Hex blake3 digest of a string.
pub fn hash_str(input: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(input.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Hex blake3 digest of a JSON value in canonical form.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_change_the_hash() {
        let a = json!({"b": 1, "a": [true, null]});
        let b = json!({"a": [true, null], "b": 1});
        assert_eq!(hash_value(&a), hash_value(&b));
    }

    #[test]
    fn canonical_form_is_compact_and_sorted() {
        let v = json!({"z": "s", "a": 2});
        assert_eq!(to_canonical_json(&v), r#"{"a":2,"z":"s"}"#);
    }
}
