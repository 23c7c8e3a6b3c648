//! Shared application state handed to every handler, mirroring the
//! teacher's `AppState { db, broadcast }` pattern: a handful of `Arc`
//! handles to the crates that actually do the work, nothing more.

use fin_artifacts::ArtifactStore;
use fin_events::EventBus;
use fin_graph::Scheduler;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    pub artifacts: Arc<ArtifactStore>,
    pub events: Arc<EventBus>,
}
