//! Scheduler-local configuration, sourced from the process-wide
//! [`fin_tooling::config::RuntimeConfig`] rather than re-reading the
//! environment itself.

use fin_tooling::config::RuntimeConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub node_default_timeout: Duration,
    pub default_max_attempts: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { node_default_timeout: Duration::from_secs(60), default_max_attempts: 3 }
    }
}

impl From<&RuntimeConfig> for SchedulerConfig {
    fn from(runtime: &RuntimeConfig) -> Self {
        Self { node_default_timeout: runtime.node_default_timeout, default_max_attempts: 3 }
    }
}
