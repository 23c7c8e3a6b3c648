//! Agent-orchestrator error taxonomy. An orchestrator's own failures are
//! collected here and lifted into `fin_graph::SchedulerError::NodeFailed`
//! at the one seam a `Node`'s `run` closure actually returns through --
//! orchestrators never touch `SchedulerError` directly.

use fin_artifacts::ArtifactError;
use fin_contracts::ContractError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("missing required state at {0:?}")]
    MissingState(String),

    #[error("malformed resume payload: {0}")]
    InvalidResume(String),
}

impl AgentError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AgentError::Artifact(e) => e.error_code(),
            AgentError::Contract(e) => e.error_code(),
            AgentError::MissingState(_) => "ValidationError",
            AgentError::InvalidResume(_) => "InvalidResumePayload",
        }
    }
}

/// Wrap an orchestrator failure for the `Node::run` boundary, tagged
/// with the node that produced it.
pub fn node_failed(node: impl Into<String>, error: AgentError) -> fin_graph::SchedulerError {
    fin_graph::SchedulerError::NodeFailed { node: node.into(), source: Box::new(error) }
}
