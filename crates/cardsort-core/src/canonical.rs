//! Canonical JSON encoding for deterministic serialization.
//!
//! Rules:
//! - Object keys sorted by byte comparison, at every nesting level
//! - Compact output (no whitespace)
//! - Strings escaped exactly as serde_json escapes them
//!
//! The canonical encoding is critical: a template is round-tripped through
//! JSON export/import, and its checksum must re-verify regardless of the
//! key order the other side happened to write.

use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// Encode any serializable document to canonical JSON bytes.
pub fn canonical_json_bytes<T: Serialize>(doc: &T) -> Result<Vec<u8>, CoreError> {
    let value = serde_json::to_value(doc)?;
    let mut buf = Vec::new();
    write_value(&mut buf, &value)?;
    Ok(buf)
}

/// Encode any serializable document to a canonical JSON string.
pub fn canonical_json_string<T: Serialize>(doc: &T) -> Result<String, CoreError> {
    let bytes = canonical_json_bytes(doc)?;
    // write_value only emits output produced by serde_json, which is UTF-8
    String::from_utf8(bytes).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Recursively encode a JSON value.
fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => buf.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => write_string(buf, s)?,
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item)?;
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            // Sort explicitly rather than relying on the map's internal
            // ordering, which depends on serde_json feature flags.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            buf.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key)?;
                buf.push(b':');
                write_value(buf, &map[key.as_str()])?;
            }
            buf.push(b'}');
        }
    }
    Ok(())
}

/// Encode a JSON string with serde_json's escaping.
fn write_string(buf: &mut Vec<u8>, s: &str) -> Result<(), CoreError> {
    let escaped = serde_json::to_string(s)?;
    buf.extend_from_slice(escaped.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_order_is_normalized() {
        let a: Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(
            canonical_json_bytes(&a).unwrap(),
            canonical_json_bytes(&b).unwrap()
        );
        assert_eq!(canonical_json_string(&a).unwrap(), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let doc = json!({"outer": {"z": 1, "a": {"y": 2, "x": 3}}, "first": true});
        assert_eq!(
            canonical_json_string(&doc).unwrap(),
            r#"{"first":true,"outer":{"a":{"x":3,"y":2},"z":1}}"#
        );
    }

    #[test]
    fn test_array_order_preserved() {
        let doc = json!({"ids": ["b", "a", "c"]});
        assert_eq!(
            canonical_json_string(&doc).unwrap(),
            r#"{"ids":["b","a","c"]}"#
        );
    }

    #[test]
    fn test_compact_output() {
        let doc = json!({"n": null, "t": true, "f": false, "i": 42});
        let s = canonical_json_string(&doc).unwrap();
        assert!(!s.contains(' '));
        assert_eq!(s, r#"{"f":false,"i":42,"n":null,"t":true}"#);
    }

    #[test]
    fn test_string_escaping() {
        let doc = json!({"label": "a \"quote\" and \n newline"});
        let s = canonical_json_string(&doc).unwrap();
        let back: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(back["label"], "a \"quote\" and \n newline");
    }

    #[test]
    fn test_deterministic_across_calls() {
        let doc = json!({"study": {"title": "Nav"}, "cards": [1, 2, 3]});
        assert_eq!(
            canonical_json_bytes(&doc).unwrap(),
            canonical_json_bytes(&doc).unwrap()
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeMap;

        proptest! {
            #[test]
            fn canonical_form_reparses_to_the_same_value(
                map in proptest::collection::btree_map("[a-z]{1,8}", "\\PC{0,20}", 0..8)
            ) {
                let doc: BTreeMap<String, String> = map;
                let s = canonical_json_string(&doc).unwrap();
                let back: Value = serde_json::from_str(&s).unwrap();
                prop_assert_eq!(back, serde_json::to_value(&doc).unwrap());
            }

            #[test]
            fn insertion_order_never_leaks(
                map in proptest::collection::btree_map("[a-z]{1,8}", 0u32..1000, 0..8)
            ) {
                let forward: serde_json::Map<String, Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), json!(v)))
                    .collect();
                let reverse: serde_json::Map<String, Value> = map
                    .iter()
                    .rev()
                    .map(|(k, v)| (k.clone(), json!(v)))
                    .collect();
                prop_assert_eq!(
                    canonical_json_bytes(&Value::Object(forward)).unwrap(),
                    canonical_json_bytes(&Value::Object(reverse)).unwrap()
                );
            }
        }
    }
}
