//! Structured logging setup and field redaction.
//!
//! Installs a `tracing-subscriber` global subscriber according to
//! [`crate::config::RuntimeConfig`]'s `log_format`/`log_level`, and
//! exposes [`redact`] so the boundary logger can scrub sensitive fields
//! before a diagnostic ever reaches a sink.

use crate::config::{LogFormat, RuntimeConfig};
use std::time::Instant;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Initialize the process-wide tracing subscriber. Idempotent only in the
/// sense that calling it twice panics (as `tracing`'s global dispatcher
/// does) -- callers invoke this exactly once, at process start.
pub fn init(config: &RuntimeConfig) {
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

/// Replace the value of any JSON object key in `redact_keys` (case
/// insensitive) with `"[redacted]"`, recursively. Used by the boundary
/// logger on every diagnostic payload before it is emitted, and by the
/// LLM port when `log_llm_payloads` is left at its default `false`.
pub fn redact(value: &mut serde_json::Value, redact_keys: &[String]) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if redact_keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
                    *val = serde_json::Value::String("[redacted]".to_string());
                } else {
                    redact(val, redact_keys);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                redact(item, redact_keys);
            }
        }
        _ => {}
    }
}

/// RAII guard that logs entry/exit timing of a boundary crossing at
/// debug level. The boundary logger uses the richer
/// `fin-events`/`fin-observability` path for incident records; this is
/// the lightweight function-scoped sibling used inside hot loops.
pub struct LogGuard {
    name: String,
    start: Instant,
}

impl LogGuard {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!(name = %name, "entering");
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        debug!(name = %self.name, elapsed_ms = self.start.elapsed().as_millis() as u64, "exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redact_scrubs_nested_keys_case_insensitively() {
        let mut value = json!({
            "node": "intent",
            "headers": {"Authorization": "Bearer xyz", "X-Id": "1"},
            "items": [{"api_key": "secret"}],
        });
        redact(&mut value, &["authorization".to_string(), "api_key".to_string()]);
        assert_eq!(value["headers"]["Authorization"], "[redacted]");
        assert_eq!(value["items"][0]["api_key"], "[redacted]");
        assert_eq!(value["node"], "intent");
    }
}
