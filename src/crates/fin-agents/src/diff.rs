//! Builds the namespace-scoped `update` value an orchestrator hands
//! back in its `Command`. Every agent writes under its own top-level
//! key only -- that's what keeps fanned-out updates disjoint and lets
//! `merge_round` combine them without a conflict.

use serde_json::{json, Value};

/// Wrap `payload` under `namespace`, the form `Command::with_update`
/// expects: `{ <namespace>: payload }`.
pub fn namespaced(namespace: &str, payload: Value) -> Value {
    json!({ namespace: payload })
}

/// The shape every producing agent writes: a pointer to the artifact it
/// just published, plus whatever small scalars downstream nodes read
/// directly off state rather than re-fetching the artifact for.
pub fn artifact_pointer(artifact_id: &str, kind: &str, extra: Value) -> Value {
    let mut body = json!({ "artifact_id": artifact_id, "kind": kind });
    if let (Value::Object(base), Value::Object(extra)) = (&mut body, extra) {
        for (k, v) in extra {
            base.insert(k, v);
        }
    }
    body
}

/// `{ intent: { resolved_symbol, candidates } }` -- written once intent
/// resolves, read by every downstream research agent.
pub fn intent_diff(resolved_symbol: &str, candidates: &[String]) -> Value {
    namespaced(
        "intent",
        json!({ "resolved_symbol": resolved_symbol, "candidates": candidates }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_wraps_under_the_given_key() {
        let diff = namespaced("news", json!({"count": 3}));
        assert_eq!(diff, json!({"news": {"count": 3}}));
    }

    #[test]
    fn artifact_pointer_merges_extra_scalars_alongside_the_pointer() {
        let diff = artifact_pointer("abc123", "news.items_list", json!({"count": 3}));
        assert_eq!(diff, json!({"artifact_id": "abc123", "kind": "news.items_list", "count": 3}));
    }

    #[test]
    fn intent_diff_carries_resolved_symbol_and_candidates() {
        let diff = intent_diff("GOOGL", &["GOOG".to_string(), "GOOGL".to_string()]);
        assert_eq!(diff, json!({"intent": {"resolved_symbol": "GOOGL", "candidates": ["GOOG", "GOOGL"]}}));
    }
}
