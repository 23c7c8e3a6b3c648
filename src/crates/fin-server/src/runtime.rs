//! Builds the process-wide [`AppState`] from a loaded
//! [`fin_tooling::config::RuntimeConfig`]: instantiates the checkpoint
//! store, artifact store, event bus and the compiled research graph, and
//! registers the five artifact contracts exactly once at startup. Only
//! the in-memory backends ship in this crate -- an `External` backend
//! choice is a host-application wiring point this crate declines to
//! guess at.

use crate::state::AppState;
use fin_artifacts::{ArtifactStore, InMemoryBlobStore};
use fin_checkpoint::InMemoryCheckpointSaver;
use fin_contracts::ContractRegistry;
use fin_events::EventBus;
use fin_graph::{RetryPolicy, Scheduler, SchedulerConfig};
use fin_tooling::config::{BackendKind, RuntimeConfig};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("backend {0:?} has no concrete implementation wired into this binary")]
    UnsupportedBackend(BackendKind),

    #[error(transparent)]
    Contract(#[from] fin_contracts::ContractError),

    #[error(transparent)]
    Scheduler(#[from] fin_graph::SchedulerError),
}

pub fn build_app_state(config: &RuntimeConfig) -> Result<AppState, StartupError> {
    if !matches!(config.checkpoint_backend, BackendKind::Memory) {
        return Err(StartupError::UnsupportedBackend(config.checkpoint_backend.clone()));
    }
    if !matches!(config.artifact_backend, BackendKind::Memory) {
        return Err(StartupError::UnsupportedBackend(config.artifact_backend.clone()));
    }

    let checkpointer = Arc::new(InMemoryCheckpointSaver::new());
    let artifacts = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
    let events = Arc::new(EventBus::new(config.event_buffer_high_water));

    let mut registry = ContractRegistry::new();
    fin_agents::register_contracts(&mut registry)?;
    let registry = Arc::new(registry);

    let graph = fin_agents::build_graph(Arc::clone(&artifacts), registry, RetryPolicy::default())?;
    let scheduler_config = SchedulerConfig::from(config);
    let scheduler = Scheduler::new(graph, checkpointer, Arc::clone(&events), scheduler_config);

    Ok(AppState { scheduler, artifacts, events })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_default_runtime_config_builds_app_state() {
        let config = RuntimeConfig::default();
        assert!(build_app_state(&config).is_ok());
    }

    #[test]
    fn an_external_checkpoint_backend_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.checkpoint_backend = BackendKind::External("postgres".into());
        assert!(matches!(build_app_state(&config), Err(StartupError::UnsupportedBackend(_))));
    }
}
