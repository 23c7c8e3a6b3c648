//! Error types for the LLM provider port.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("provider unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl LlmError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Http(_) | LlmError::ServiceUnavailable(_) | LlmError::Timeout(_) | LlmError::RateLimitExceeded(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            LlmError::Http(_) => "TransientIOError",
            LlmError::Serialization(_) => "ValidationError",
            LlmError::Authentication(_) => "AuthenticationError",
            LlmError::ApiKeyNotFound(_) => "AuthenticationError",
            LlmError::ModelNotFound(_) => "ModelNotFound",
            LlmError::ServiceUnavailable(_) => "TransientIOError",
            LlmError::RateLimitExceeded(_) => "TransientIOError",
            LlmError::InvalidRequest(_) => "ValidationError",
            LlmError::InvalidResponse(_) => "ValidationError",
            LlmError::Timeout(_) => "NodeTimeout",
            LlmError::Config(_) => "ConfigError",
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Serialization(err.to_string())
    }
}
