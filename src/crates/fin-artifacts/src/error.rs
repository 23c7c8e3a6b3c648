//! Artifact store errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArtifactError>;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact {0} not found")]
    NotFound(String),

    #[error("artifact {artifact_id} has kind {actual} ({actual_version}), expected {expected} ({expected_version})")]
    KindMismatch {
        artifact_id: String,
        actual: String,
        actual_version: String,
        expected: String,
        expected_version: String,
    },

    #[error("artifact {artifact_id} already exists with different content")]
    Conflict { artifact_id: String },

    #[error("contract validation failed for kind {kind}: {source}")]
    Contract { kind: String, #[source] source: fin_contracts::ContractError },

    #[error("blob store error: {0}")]
    Storage(String),

    #[error("downcast failed: artifact {0} was not the expected Rust type")]
    TypeMismatch(String),
}

impl ArtifactError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ArtifactError::NotFound(_) => "ArtifactNotFound",
            ArtifactError::KindMismatch { .. } => "KindMismatch",
            ArtifactError::Conflict { .. } => "ArtifactConflict",
            ArtifactError::Contract { source, .. } => source.error_code(),
            ArtifactError::Storage(_) => "TransientIOError",
            ArtifactError::TypeMismatch(_) => "KindMismatch",
        }
    }
}

impl From<fin_contracts::ContractError> for ArtifactError {
    fn from(source: fin_contracts::ContractError) -> Self {
        let kind = match &source {
            fin_contracts::ContractError::UnknownKind(k) => k.clone(),
            fin_contracts::ContractError::UnknownVersion { kind, .. } => kind.clone(),
            fin_contracts::ContractError::SchemaViolation { .. } => "<schema>".to_string(),
            fin_contracts::ContractError::DuplicateRegistration { kind, .. } => kind.clone(),
            fin_contracts::ContractError::UnauthorizedKind { kind, .. } => kind.clone(),
            fin_contracts::ContractError::TypeMismatch { kind, .. } => kind.clone(),
        };
        ArtifactError::Contract { kind, source }
    }
}
