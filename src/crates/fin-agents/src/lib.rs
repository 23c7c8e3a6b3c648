//! The five research agents: typed artifact contracts, state readers,
//! namespaced state diffs, event-preview mappers, and the orchestrator
//! functions wired into one compiled research graph.

pub mod agents;
pub mod contracts;
pub mod diff;
pub mod error;
pub mod state;
pub mod synth;
pub mod types;
pub mod view;

pub use agents::build_graph;
pub use contracts::register_contracts;
pub use error::{AgentError, Result};
