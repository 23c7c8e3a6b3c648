//! Wire types for the event-streaming protocol: the envelope every
//! event is wrapped in, and the six payload shapes it can carry.

use chrono::{DateTime, Utc};
use fin_artifacts::ArtifactReference;
use fin_tooling::Incident;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROTOCOL_VERSION: &str = "v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Running,
    Done,
    Error,
    Attention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Running,
    Paused,
    Done,
    Error,
}

/// The per-step emission from an agent, carried as `state.update`'s
/// payload. `reference` is only `None` for steps that produced no
/// durable artifact (e.g. a status-only update).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutputEnvelope {
    pub kind: String,
    pub version: String,
    pub summary: String,
    pub preview: Value,
    pub reference: Option<ArtifactReference>,
    #[serde(default)]
    pub error_logs: Vec<Incident>,
}

/// A pause record. One active interrupt per thread; delivered as the
/// `interrupt.request` payload and persisted alongside the thread until
/// a resume payload validates against `schema`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub data: Value,
    pub schema: Value,
    #[serde(default)]
    pub ui_hints: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventPayload {
    #[serde(rename = "content.delta")]
    ContentDelta { content: String },

    #[serde(rename = "agent.status")]
    AgentStatus { status: AgentStatus, node: String },

    #[serde(rename = "state.update")]
    StateUpdate(AgentOutputEnvelope),

    #[serde(rename = "interrupt.request")]
    InterruptRequest(InterruptRequest),

    #[serde(rename = "lifecycle.status")]
    LifecycleStatus { status: LifecycleStatus },

    #[serde(rename = "error")]
    Error { message: String, error_code: String, node: String },
}

impl EventPayload {
    pub fn type_name(&self) -> &'static str {
        match self {
            EventPayload::ContentDelta { .. } => "content.delta",
            EventPayload::AgentStatus { .. } => "agent.status",
            EventPayload::StateUpdate(_) => "state.update",
            EventPayload::InterruptRequest(_) => "interrupt.request",
            EventPayload::LifecycleStatus { .. } => "lifecycle.status",
            EventPayload::Error { .. } => "error",
        }
    }
}

/// The protocol-level wire unit. `seq_id` is strictly increasing and
/// gap-free within a thread; across threads no ordering is implied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEvent {
    pub protocol_version: String,
    pub seq_id: u64,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl AgentEvent {
    /// Consumers call this on every event they did not produce
    /// themselves (replayed history, events read off the wire) -- the
    /// bus only ever stamps the current version, so a mismatch here
    /// means the event came from somewhere else.
    pub fn check_protocol_version(&self) -> std::result::Result<(), crate::error::EventBusError> {
        if self.protocol_version != PROTOCOL_VERSION {
            return Err(crate::error::EventBusError::ProtocolVersionMismatch {
                expected: PROTOCOL_VERSION.to_string(),
                found: self.protocol_version.clone(),
            });
        }
        Ok(())
    }
}
