//! Typed readers over a node's `Value` input. A node's `NodeFn` receives
//! the merged thread state as a bare `serde_json::Value` -- these
//! functions are the only place that reaches into specific paths, so a
//! shape change only touches this file.

use crate::error::{AgentError, Result};
use serde_json::Value;

/// The thread identifier stamped into state when the run started. Every
/// orchestrator needs this for content-addressed artifact publishing;
/// it's the one field `Thread::new` seeds before any node ever runs.
pub fn thread_id(state: &Value) -> Result<String> {
    state
        .get("thread_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::MissingState("thread_id".into()))
}

/// The user-authored message that opened the thread, e.g. "how's GOOG
/// looking this quarter". Lives at `messages[0].content`.
pub fn raw_query(state: &Value) -> Result<String> {
    state
        .get("messages")
        .and_then(Value::as_array)
        .and_then(|m| m.first())
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::MissingState("messages/0/content".into()))
}

/// The candidate tickers an earlier intent step narrowed the query to,
/// before an interrupt asked the user to pick one.
pub fn ticker_candidates(state: &Value) -> Vec<String> {
    state
        .get("intent")
        .and_then(|v| v.get("candidates"))
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

/// The ticker chosen earlier in the thread, once intent has resolved.
pub fn resolved_symbol(state: &Value) -> Result<String> {
    state
        .get("intent")
        .and_then(|v| v.get("resolved_symbol"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::MissingState("intent/resolved_symbol".into()))
}

/// The symbol a human picked when resuming from a `ticker_selection`
/// interrupt. Only present on a resumed run.
pub fn resume_selected_symbol(state: &Value) -> Result<String> {
    state
        .get("resume")
        .and_then(|v| v.get("selected_symbol"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::InvalidResume("resume/selected_symbol missing".into()))
}

/// Artifact-id pointers the debate agent reads its upstream inputs
/// from, keyed by producing agent name.
pub fn upstream_artifact_id(state: &Value, agent: &str) -> Result<String> {
    state
        .get(agent)
        .and_then(|v| v.get("artifact_id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::MissingState(format!("{agent}/artifact_id")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_query_reads_the_first_message() {
        let state = json!({"messages": [{"role": "user", "content": "how's GOOG doing"}]});
        assert_eq!(raw_query(&state).unwrap(), "how's GOOG doing");
    }

    #[test]
    fn missing_messages_is_a_missing_state_error() {
        let state = json!({});
        assert!(matches!(raw_query(&state), Err(AgentError::MissingState(_))));
    }

    #[test]
    fn thread_id_reads_the_seeded_field() {
        let state = json!({"thread_id": "t1"});
        assert_eq!(thread_id(&state).unwrap(), "t1");
    }

    #[test]
    fn resume_selected_symbol_reads_the_resume_namespace() {
        let state = json!({"resume": {"selected_symbol": "GOOGL"}});
        assert_eq!(resume_selected_symbol(&state).unwrap(), "GOOGL");
    }
}
