//! Canonical JSON serialization and content hashing.
//!
//! The artifact store's `save()` computes a deterministic `artifact_id` as
//! a hash over `{kind, version, canonical_data_bytes, thread_id}`; this
//! module provides the one canonicalization routine every crate that
//! needs a stable hash goes through, so two callers never disagree on
//! what "the same JSON" means.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Serialize a JSON value with object keys sorted recursively, producing
/// the same bytes regardless of field insertion order.
pub fn canonical_json_bytes(value: &Value) -> Vec<u8> {
    let sorted = sort_keys(value);
    serde_json::to_vec(&sorted).expect("canonical json values always serialize")
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted = serde_json::Map::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for k in keys {
                sorted.insert(k.clone(), sort_keys(&map[k]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Hash arbitrary byte segments into a single deterministic hex digest,
/// used to derive content-addressed ids from `{kind, version, data,
/// thread_id}` tuples.
pub fn content_hash(segments: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for segment in segments {
        hasher.update((segment.len() as u64).to_le_bytes());
        hasher.update(segment);
    }
    let digest = hasher.finalize();
    hex(&digest)
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(&mut s, "{b:02x}").unwrap();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_affect_canonical_bytes() {
        let a = json!({"b": 2, "a": 1});
        let b = json!({"a": 1, "b": 2});
        assert_eq!(canonical_json_bytes(&a), canonical_json_bytes(&b));
    }

    #[test]
    fn content_hash_is_deterministic_and_order_sensitive_across_segments() {
        let h1 = content_hash(&[b"kind", b"v1", b"{}", b"t1"]);
        let h2 = content_hash(&[b"kind", b"v1", b"{}", b"t1"]);
        let h3 = content_hash(&[b"kind", b"v1", b"{}", b"t2"]);
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }
}
