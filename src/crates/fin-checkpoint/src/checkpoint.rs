//! Checkpoint data structures: a complete, point-in-time snapshot of a
//! thread's execution state, persisted after every scheduler round and
//! every suspension.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifies which checkpoint to read or write. A bare `thread_id`
/// (no `checkpoint_id`) means "the latest checkpoint for this thread".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub thread_id: String,
    pub checkpoint_id: Option<String>,
}

impl CheckpointConfig {
    pub fn latest(thread_id: impl Into<String>) -> Self {
        Self { thread_id: thread_id.into(), checkpoint_id: None }
    }

    pub fn specific(thread_id: impl Into<String>, checkpoint_id: impl Into<String>) -> Self {
        Self { thread_id: thread_id.into(), checkpoint_id: Some(checkpoint_id.into()) }
    }
}

/// Why this checkpoint was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointSource {
    /// The very first checkpoint, taken when a thread is created.
    Input,
    /// Written after a normal scheduler round.
    Loop,
    /// Written after an interrupt resume applies its update.
    Update,
}

/// Per-checkpoint bookkeeping: which superstep this was, and why it was
/// taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub step: u64,
    pub source: CheckpointSource,
    pub nodes_run: Vec<String>,
}

/// The persisted state of a `Thread` at one `checkpoint_seq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub ts: chrono::DateTime<chrono::Utc>,
    pub checkpoint_seq: u64,
    /// The full per-node state slot tree, as opaque canonical JSON --
    /// `fin-checkpoint` never interprets it, only persists it.
    pub state: Value,
    pub last_seq_id: u64,
    pub pending_interrupt: Option<Value>,
    pub terminal: bool,
}

/// A complete checkpoint read: the config that locates it, the state
/// snapshot itself, its metadata, and a link to its predecessor for
/// history traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointTuple {
    pub config: CheckpointConfig,
    pub checkpoint: Checkpoint,
    pub metadata: CheckpointMetadata,
    pub parent_config: Option<CheckpointConfig>,
}
