//! Structured diagnostic types shared by every boundary crossing. These
//! are data, not behavior -- the boundary logger in [`crate::logging`]
//! decides when to emit one; this module only defines the shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One structured incident attached to an `AgentOutputEnvelope`'s
/// `error_logs`. Ordered -- callers append, never reorder or dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub error_code: String,
    pub message: String,
    pub node: Option<String>,
    pub retryable: bool,
}

impl Incident {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { error_code: error_code.into(), message: message.into(), node: None, retryable: false }
    }

    pub fn at_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

/// Replay context attached to a [`BoundaryEventPayload`]: enough to
/// reconstruct where a run was when the incident happened without
/// re-executing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayContext {
    pub current_node: String,
    pub artifact_refs: Vec<String>,
    pub state_snapshot_hash: String,
}

/// The payload logged at every boundary crossing whose outcome is not
/// a plain success: a node failure, a contract violation, an interrupt
/// rejection. This is the sole structured-log shape the runtime emits
/// for non-OK outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryEventPayload {
    pub node: String,
    pub artifact_id: Option<String>,
    pub contract_kind: Option<String>,
    pub error_code: String,
    pub replay: ReplayContext,
    #[serde(default)]
    pub detail: Option<Value>,
}
