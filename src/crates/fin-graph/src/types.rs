//! Core data model: `Thread`, `Node`, `Subgraph`, and the snapshot view
//! `state()` returns to callers.

use crate::retry::RetryPolicy;
use chrono::{DateTime, Utc};
use fin_artifacts::ArtifactReference;
use fin_events::InterruptRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A node's application logic: a typed state slice in, a `Command` out.
/// Registered once at graph-build time, never constructed per run --
/// nodes are stateless between invocations, the `Thread` carries state.
pub type NodeFn = Arc<
    dyn Fn(Value) -> Pin<Box<dyn Future<Output = crate::error::Result<crate::command::Command>> + Send>>
        + Send
        + Sync,
>;

#[derive(Clone)]
pub struct Node {
    pub node_id: String,
    pub agent_id: String,
    pub retry_policy: RetryPolicy,
    pub run: NodeFn,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("node_id", &self.node_id).field("agent_id", &self.agent_id).finish()
    }
}

/// A directed subgraph owned by one agent package: one entry node, one
/// or more terminal nodes that hand control back to the global graph.
#[derive(Debug, Clone)]
pub struct Subgraph {
    pub name: String,
    pub entry: String,
    pub terminals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Pending,
    Running,
    Done,
    Error,
}

/// Snapshot read returned by `state()`: everything a caller needs
/// without replaying the thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadState {
    pub thread_id: String,
    pub is_running: bool,
    pub last_seq_id: u64,
    pub node_statuses: HashMap<String, NodeStatus>,
    pub interrupt: Option<InterruptRequest>,
    pub agent_outputs: Vec<ArtifactReference>,
    pub messages: Vec<Value>,
}

/// The full execution state of a thread: what gets checkpointed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
    pub terminal: bool,
    pub state: Value,
    pub last_seq_id: u64,
    /// The checkpoint sequence number this thread last wrote at --
    /// distinct from `last_seq_id` (the event bus's counter). Incremented
    /// on every persist so the saver's monotonicity check is meaningful
    /// even across rounds that emit no bus events.
    pub checkpoint_seq: u64,
    pub pending_interrupt: Option<InterruptRequest>,
    pub pending_interrupt_node: Option<String>,
    pub messages: Vec<Value>,
    pub node_statuses: HashMap<String, NodeStatus>,
    pub agent_outputs: Vec<ArtifactReference>,
    pub ready: Vec<String>,
    pub is_running: bool,
}

impl Thread {
    pub fn new(thread_id: impl Into<String>, entry_node: impl Into<String>) -> Self {
        let thread_id = thread_id.into();
        Self {
            state: serde_json::json!({ "thread_id": thread_id }),
            thread_id,
            created_at: Utc::now(),
            terminal: false,
            last_seq_id: 0,
            checkpoint_seq: 0,
            pending_interrupt: None,
            pending_interrupt_node: None,
            messages: Vec::new(),
            node_statuses: HashMap::new(),
            agent_outputs: Vec::new(),
            ready: vec![entry_node.into()],
            is_running: false,
        }
    }

    pub fn snapshot(&self) -> ThreadState {
        ThreadState {
            thread_id: self.thread_id.clone(),
            is_running: self.is_running,
            last_seq_id: self.last_seq_id,
            node_statuses: self.node_statuses.clone(),
            interrupt: self.pending_interrupt.clone(),
            agent_outputs: self.agent_outputs.clone(),
            messages: self.messages.clone(),
        }
    }
}
