//! Scheduler and interrupt-controller error taxonomy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("thread {0} already has an active run")]
    ThreadAlreadyRunning(String),

    #[error("no thread {0}")]
    UnknownThread(String),

    #[error("graph failed compilation: {0}")]
    GraphCompiled(String),

    #[error("merge conflict at {path:?}: node {winner:?} and an earlier writer in the same round disagree")]
    MergeConflict { path: String, winner: String },

    #[error("node {node} exceeded its deadline")]
    NodeTimeout { node: String },

    #[error("node {node} failed after exhausting retries: {source}")]
    NodeFailed { node: String, #[source] source: Box<dyn std::error::Error + Send + Sync> },

    #[error(transparent)]
    Interrupt(#[from] InterruptError),

    #[error(transparent)]
    Checkpoint(#[from] fin_checkpoint::CheckpointError),

    #[error(transparent)]
    Artifact(#[from] fin_artifacts::ArtifactError),

    #[error(transparent)]
    Contract(#[from] fin_contracts::ContractError),

    #[error("transient I/O error: {0}")]
    TransientIo(String),
}

#[derive(Debug, Error)]
pub enum InterruptError {
    #[error("thread {0} has no pending interrupt")]
    NoPendingInterrupt(String),

    #[error("resume payload invalid at {path}: {reason}")]
    InvalidResumePayload { path: String, reason: String },

    #[error("interrupt schema for {kind:?} does not compile: {reason}")]
    MalformedSchema { kind: String, reason: String },
}

impl SchedulerError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SchedulerError::ThreadAlreadyRunning(_) => "ThreadAlreadyRunning",
            SchedulerError::UnknownThread(_) => "UnknownThread",
            SchedulerError::GraphCompiled(_) => "GraphCompiled",
            SchedulerError::MergeConflict { .. } => "ValidationError",
            SchedulerError::NodeTimeout { .. } => "NodeTimeout",
            SchedulerError::NodeFailed { .. } => "ValidationError",
            SchedulerError::Interrupt(e) => e.error_code(),
            SchedulerError::Checkpoint(e) => e.error_code(),
            SchedulerError::Artifact(e) => e.error_code(),
            SchedulerError::Contract(e) => e.error_code(),
            SchedulerError::TransientIo(_) => "TransientIOError",
        }
    }

    /// Whether the scheduler's retry policy should even consider
    /// retrying this error -- a cheap pre-filter before consulting the
    /// per-node `RetryPolicy` attempt count.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SchedulerError::TransientIo(_) | SchedulerError::NodeTimeout { .. })
    }
}

impl InterruptError {
    pub fn error_code(&self) -> &'static str {
        match self {
            InterruptError::NoPendingInterrupt(_) => "NoPendingInterrupt",
            InterruptError::InvalidResumePayload { .. } => "InvalidResumePayload",
            InterruptError::MalformedSchema { .. } => "ValidationError",
        }
    }
}
