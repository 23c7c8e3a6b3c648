//! The `LlmProvider` port. No concrete provider (Ollama, OpenAI,
//! Claude, ...) is wired here -- a host application implements this
//! trait over whichever HTTP client and wire format its chosen provider
//! needs and hands the trait object to an agent orchestrator.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages, temperature: None, max_tokens: None }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: Option<UsageMetadata>,
}

/// The one operation every agent orchestrator needs from a language
/// model. A concrete implementor owns its own retry/backoff and the
/// translation between `CompletionRequest`/`CompletionResponse` and its
/// provider's wire format.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            let last = request.messages.last().ok_or_else(|| LlmError::InvalidRequest("no messages".into()))?;
            Ok(CompletionResponse { content: last.content.clone(), usage: None })
        }
    }

    #[tokio::test]
    async fn a_trait_object_can_be_driven_through_the_port() {
        let provider: Box<dyn LlmProvider> = Box::new(EchoProvider);
        let response = provider.complete(CompletionRequest::new(vec![ChatMessage::user("hello")])).await.unwrap();
        assert_eq!(response.content, "hello");
    }
}
