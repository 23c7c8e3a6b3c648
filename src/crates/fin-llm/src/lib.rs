//! The LLM provider port. Concrete provider wiring (Ollama, OpenAI,
//! Claude, Gemini, ...) is deliberately not implemented here -- a host
//! application supplies an `LlmProvider` over whichever vendor it runs
//! against.

pub mod config;
pub mod error;
pub mod provider;

pub use config::ProviderConfig;
pub use error::{LlmError, Result};
pub use provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role, UsageMetadata};
