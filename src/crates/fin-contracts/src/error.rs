//! Contract registry error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    /// `register()` called twice for the same `(kind, version)`. Fatal at
    /// startup -- the registry is process-wide and initialized once.
    #[error("kind {kind:?} version {version:?} is already registered")]
    DuplicateRegistration { kind: String, version: String },

    #[error("unknown contract kind {0:?}")]
    UnknownKind(String),

    #[error("kind {kind:?} has no registered version {version:?}")]
    UnknownVersion { kind: String, version: String },

    /// Strict, path-accurate schema validation failure. Never produced by
    /// a coercion attempt -- the registry has none.
    #[error("schema violation at {path}: {reason}")]
    SchemaViolation { path: String, reason: String },

    #[error("consumer {consumer:?} is not allowed to read kind {kind:?} from producer {producer:?}")]
    UnauthorizedKind {
        consumer: String,
        producer: String,
        kind: String,
    },

    #[error("registered value for kind {kind:?} version {version:?} has an unexpected Rust type")]
    TypeMismatch { kind: String, version: String },
}

pub type Result<T> = std::result::Result<T, ContractError>;

impl ContractError {
    /// The taxonomy string this error serializes as on the wire (error
    /// responses, `BoundaryEventPayload.error_code`).
    pub fn error_code(&self) -> &'static str {
        match self {
            ContractError::DuplicateRegistration { .. } => "DuplicateRegistration",
            ContractError::UnknownKind(_) => "UnknownKind",
            ContractError::UnknownVersion { .. } => "UnknownKind",
            ContractError::SchemaViolation { .. } => "ValidationError",
            ContractError::UnauthorizedKind { .. } => "UnauthorizedKind",
            ContractError::TypeMismatch { .. } => "KindMismatch",
        }
    }
}
