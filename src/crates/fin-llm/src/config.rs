//! Provider-agnostic configuration a concrete `LlmProvider` implementor
//! (outside this crate, wired in by the host application) would take as
//! its constructor argument.

use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: default_timeout(),
            max_retries: default_max_retries(),
        }
    }

    /// Load the API key from `env_var`, leaving `base_url`/`model` as
    /// given -- the one piece of provider wiring this crate does take a
    /// position on, since every concrete provider needs it the same way.
    pub fn from_env(env_var: &str, base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var(env_var).map_err(|_| LlmError::ApiKeyNotFound(env_var.to_string()))?;
        Ok(Self::new(api_key, base_url, model))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_apply_on_top_of_defaults() {
        let config = ProviderConfig::new("key", "https://api.example.com", "gpt-test")
            .with_timeout(Duration::from_secs(10))
            .with_max_retries(1);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn from_env_fails_cleanly_when_the_variable_is_unset() {
        let result = ProviderConfig::from_env("FIN_LLM_TEST_KEY_NOT_SET", "https://api.example.com", "gpt-test");
        assert!(matches!(result, Err(LlmError::ApiKeyNotFound(_))));
    }
}
