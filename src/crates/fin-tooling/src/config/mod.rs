//! Configuration loading: typed struct + environment-variable overlay.
//!
//! Mirrors the recognized options in the control-API configuration surface
//! (`checkpoint_backend`, `artifact_backend`, `event_buffer_high_water`,
//! `node_default_timeout`, `log_format`, `log_level`, `log_redact_keys`,
//! `log_llm_payloads`). This module only loads and validates the struct;
//! it does not know what a checkpoint or an event is.

mod env;

pub use env::{get_env, get_env_bool, get_env_or, get_env_parse, get_env_parse_or};

use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the trait a backend-selecting config field points at is never
/// instantiated here -- `RuntimeConfig` only records the *choice*.
/// Silent migration between backend strings is never performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Memory,
    External(String),
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Memory
    }
}

impl std::str::FromStr for BackendKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "memory" | "" => BackendKind::Memory,
            other => BackendKind::External(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Text,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Json
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            other => Err(format!("unknown log_format {other:?}, expected json|text")),
        }
    }
}

const DEFAULT_REDACT_KEYS: &[&str] =
    &["authorization", "cookie", "password", "token", "secret", "api_key"];

/// Process-wide runtime configuration. Constructed once at startup via
/// [`RuntimeConfig::from_env`]; nothing in the engine re-reads the
/// environment after that (global state is initialized once, per the
/// registry's own rule).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub checkpoint_backend: BackendKind,
    pub artifact_backend: BackendKind,
    pub event_buffer_high_water: usize,
    pub node_default_timeout: Duration,
    pub log_format: LogFormat,
    pub log_level: String,
    pub log_redact_keys: Vec<String>,
    pub log_llm_payloads: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            checkpoint_backend: BackendKind::Memory,
            artifact_backend: BackendKind::Memory,
            event_buffer_high_water: 256,
            node_default_timeout: Duration::from_secs(60),
            log_format: LogFormat::Json,
            log_level: "info".to_string(),
            log_redact_keys: DEFAULT_REDACT_KEYS.iter().map(|s| s.to_string()).collect(),
            log_llm_payloads: false,
        }
    }
}

impl RuntimeConfig {
    /// Load defaults, then overlay any `FIN_*` environment variables that
    /// are present. Unknown/unset variables never override a default.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(v) = get_env("FIN_CHECKPOINT_BACKEND")? {
            cfg.checkpoint_backend = v.parse().unwrap();
        }
        if let Some(v) = get_env("FIN_ARTIFACT_BACKEND")? {
            cfg.artifact_backend = v.parse().unwrap();
        }
        if let Some(v) = get_env_parse::<usize>("FIN_EVENT_BUFFER_HIGH_WATER")? {
            cfg.event_buffer_high_water = v;
        }
        if let Some(v) = get_env_parse::<u64>("FIN_NODE_DEFAULT_TIMEOUT_SECS")? {
            cfg.node_default_timeout = Duration::from_secs(v);
        }
        if let Some(v) = get_env("FIN_LOG_FORMAT")? {
            cfg.log_format = v
                .parse()
                .map_err(crate::ToolingError::Config)?;
        }
        if let Some(v) = get_env("FIN_LOG_LEVEL")? {
            cfg.log_level = v;
        }
        if let Some(v) = get_env("FIN_LOG_REDACT_KEYS")? {
            cfg.log_redact_keys = v.split(',').map(|s| s.trim().to_lowercase()).collect();
        }
        if let Some(v) = get_env_bool("FIN_LOG_LLM_PAYLOADS")? {
            cfg.log_llm_payloads = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.event_buffer_high_water == 0 {
            return Err(crate::ToolingError::Config(
                "event_buffer_high_water must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_redact_the_standard_keys() {
        let cfg = RuntimeConfig::default();
        assert!(cfg.log_redact_keys.contains(&"api_key".to_string()));
        assert!(!cfg.log_llm_payloads);
    }

    #[test]
    fn zero_buffer_high_water_fails_validation() {
        let mut cfg = RuntimeConfig::default();
        cfg.event_buffer_high_water = 0;
        assert!(cfg.validate().is_err());
    }
}
