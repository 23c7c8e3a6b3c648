//! Route table: the fixed endpoint list for the workflow runtime's
//! external interface, wired onto one shared `AppState` with tracing
//! and CORS layers applied uniformly.

use crate::handlers;
use crate::middleware::{cors::cors_layer, logging::logging_layer};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/stream", post(handlers::stream::start_or_resume))
        .route("/stream/:thread_id", get(handlers::stream::stream_events))
        .route("/history/:thread_id", get(handlers::thread::get_history))
        .route("/thread/:thread_id", get(handlers::thread::get_thread))
        .route("/thread/:thread_id/agents", get(handlers::thread::get_thread_agents))
        .route("/api/artifacts/:artifact_id", get(handlers::artifacts::get_artifact))
        .layer(logging_layer())
        .layer(cors_layer())
        .with_state(state)
}

/// Wires an in-memory `AppState` (no `RuntimeConfig`, no env reads) for
/// tests that need a real router end to end.
pub fn create_test_router() -> (Router, AppState) {
    use fin_artifacts::{ArtifactStore, InMemoryBlobStore};
    use fin_checkpoint::InMemoryCheckpointSaver;
    use fin_contracts::ContractRegistry;
    use fin_events::EventBus;
    use fin_graph::{RetryPolicy, Scheduler, SchedulerConfig};
    use std::sync::Arc;

    let artifacts = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
    let events = Arc::new(EventBus::new(256));
    let checkpointer = Arc::new(InMemoryCheckpointSaver::new());

    let mut registry = ContractRegistry::new();
    fin_agents::register_contracts(&mut registry).expect("contract manifest registers cleanly");
    let registry = Arc::new(registry);

    let graph = fin_agents::build_graph(Arc::clone(&artifacts), registry, RetryPolicy::default())
        .expect("the research graph compiles");
    let scheduler = Scheduler::new(graph, checkpointer, Arc::clone(&events), SchedulerConfig::default());

    let state = AppState { scheduler, artifacts, events };
    (create_router(state.clone()), state)
}
