//! Golden checksum vectors for cross-implementation verification.
//!
//! Every implementation of the template checksum must produce identical
//! canonical bytes and SHA-256 digests for these documents. The expected
//! values were computed independently of this crate.

use serde_json::{json, Value};

/// A single golden vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    pub name: &'static str,
    pub description: &'static str,
    pub doc: Value,
    /// Expected canonical JSON string.
    pub canonical: &'static str,
    /// Expected SHA-256 digest, lowercase hex.
    pub checksum: &'static str,
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty_object",
            description: "Minimal document: no fields at all",
            doc: json!({}),
            canonical: "{}",
            checksum: "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
        },
        GoldenVector {
            name: "keys_out_of_order",
            description: "Keys authored in reverse order must normalize",
            doc: serde_json::from_str(r#"{"b":2,"a":1}"#).expect("vector is valid JSON"),
            canonical: r#"{"a":1,"b":2}"#,
            checksum: "43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777",
        },
        GoldenVector {
            name: "nested_mixed_values",
            description: "Nested object, array, null, and bool",
            doc: json!({"ok": true, "label": "Unsure", "nested": {"z": null, "y": [1, 2, 3]}}),
            canonical: r#"{"label":"Unsure","nested":{"y":[1,2,3],"z":null},"ok":true}"#,
            checksum: "e9777bcd3faa22613cf59d4944613f5226f8541d543f8e667fe314fcbbcc54c0",
        },
        GoldenVector {
            name: "card_id_array",
            description: "Array order is content: ids must hash in sequence",
            doc: json!({"title": "Nav sort", "cards": ["card_0000000001", "card_0000000002"]}),
            canonical: r#"{"cards":["card_0000000001","card_0000000002"],"title":"Nav sort"}"#,
            checksum: "736e5cd813404ec67eb825fe0de6678612c6df9b0117745b963917ac8a833fca",
        },
    ]
}

/// Check every vector, returning the names of any that fail.
pub fn verify_all_vectors() -> Vec<&'static str> {
    all_vectors()
        .iter()
        .filter(|v| {
            let canonical_ok = cardsort_core::canonical_json_string(&v.doc)
                .is_ok_and(|c| c == v.canonical);
            let checksum_ok =
                cardsort_core::compute_checksum(&v.doc).is_ok_and(|c| c == v.checksum);
            !canonical_ok || !checksum_ok
        })
        .map(|v| v.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsort_core::verify_checksum;

    #[test]
    fn test_all_vectors_pass() {
        let failures = verify_all_vectors();
        assert!(failures.is_empty(), "failing vectors: {failures:?}");
    }

    #[test]
    fn test_vectors_verify_as_checksums() {
        for vector in all_vectors() {
            assert!(
                verify_checksum(&vector.doc, vector.checksum),
                "vector {} did not verify",
                vector.name
            );
        }
    }
}
