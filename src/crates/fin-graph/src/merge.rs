//! Deterministic state merge for fan-out rounds. Children run on
//! independent tasks; their emitted `update`s are combined back into
//! the round's base state in a fixed order (by node id) so the result
//! never depends on completion timing.

use crate::error::SchedulerError;
use serde_json::Value;

/// Fold a round's `(node_id, update)` pairs into `base`, sorted by
/// `node_id` for determinism. A later writer recursively overwrites an
/// earlier one at shared object keys; arrays concatenate; a shared leaf
/// scalar written to two different values is a conflict.
pub fn merge_round(base: &Value, mut updates: Vec<(String, Value)>) -> Result<Value, SchedulerError> {
    updates.sort_by(|a, b| a.0.cmp(&b.0));
    let mut result = base.clone();
    for (node_id, update) in updates {
        merge_into(&mut result, update, &node_id, "$")?;
    }
    Ok(result)
}

fn merge_into(base: &mut Value, update: Value, writer: &str, path: &str) -> Result<(), SchedulerError> {
    match (base, update) {
        (b, Value::Null) if !b.is_null() => Ok(()),
        (b @ Value::Null, update) => {
            *b = update;
            Ok(())
        }
        (Value::Object(b), Value::Object(u)) => {
            for (key, value) in u {
                let child_path = format!("{path}.{key}");
                match b.get_mut(&key) {
                    Some(existing) => merge_into(existing, value, writer, &child_path)?,
                    None => {
                        b.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (Value::Array(b), Value::Array(mut u)) => {
            b.append(&mut u);
            Ok(())
        }
        (existing, incoming) => {
            if *existing == incoming {
                Ok(())
            } else {
                *existing = incoming;
                Err(SchedulerError::MergeConflict { path: path.to_string(), winner: writer.to_string() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn disjoint_keys_from_fanned_out_nodes_combine() {
        let base = json!({});
        let result = merge_round(
            &base,
            vec![
                ("fundamental".to_string(), json!({"fundamental": {"eps": 1.2}})),
                ("news".to_string(), json!({"news": {"count": 3}})),
            ],
        )
        .unwrap();
        assert_eq!(result, json!({"fundamental": {"eps": 1.2}, "news": {"count": 3}}));
    }

    #[test]
    fn lists_at_the_same_key_append() {
        let base = json!({"messages": ["a"]});
        let result = merge_round(&base, vec![("x".to_string(), json!({"messages": ["b"]}))]).unwrap();
        assert_eq!(result, json!({"messages": ["a", "b"]}));
    }

    #[test]
    fn merge_result_does_not_depend_on_input_order() {
        let base = json!({});
        let forward = merge_round(
            &base,
            vec![("a".to_string(), json!({"eps": 1.0})), ("b".to_string(), json!({"pe": 2.0}))],
        )
        .unwrap();
        let reversed = merge_round(
            &base,
            vec![("b".to_string(), json!({"pe": 2.0})), ("a".to_string(), json!({"eps": 1.0}))],
        )
        .unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn conflicting_scalar_writes_from_two_nodes_error() {
        let base = json!({});
        let err = merge_round(
            &base,
            vec![("a".to_string(), json!({"call": "buy"})), ("b".to_string(), json!({"call": "sell"}))],
        )
        .unwrap_err();
        assert!(matches!(err, SchedulerError::MergeConflict { .. }));
    }

    #[test]
    fn identical_scalar_writes_from_two_nodes_do_not_conflict() {
        let base = json!({});
        let result = merge_round(
            &base,
            vec![("a".to_string(), json!({"status": "done"})), ("b".to_string(), json!({"status": "done"}))],
        )
        .unwrap();
        assert_eq!(result, json!({"status": "done"}));
    }
}
