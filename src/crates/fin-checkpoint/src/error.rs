//! Checkpoint storage errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckpointError>;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("no checkpoint found for thread {0:?}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid checkpoint: {0}")]
    Invalid(String),
}

impl CheckpointError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CheckpointError::NotFound(_) => "CheckpointNotFound",
            CheckpointError::Serialization(_) => "ValidationError",
            CheckpointError::Storage(_) => "TransientIOError",
            CheckpointError::Invalid(_) => "ValidationError",
        }
    }
}
