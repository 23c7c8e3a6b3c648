//! The five research agents, and the one place their subgraph is
//! wired together into a compiled [`fin_graph::GraphCompiled`].

pub mod debate;
pub mod fundamental;
pub mod intent;
pub mod news;
pub mod technical;

use fin_artifacts::ArtifactStore;
use fin_contracts::ContractRegistry;
use fin_graph::{GraphBuilder, GraphCompiled, RetryPolicy, SchedulerError};
use std::sync::Arc;

/// Build the compiled research graph: intent resolves (possibly
/// pausing for disambiguation), fans out to the three research agents,
/// which all join at debate.
pub fn build_graph(store: Arc<ArtifactStore>, registry: Arc<ContractRegistry>, retry_policy: RetryPolicy) -> Result<GraphCompiled, SchedulerError> {
    GraphBuilder::new()
        .add_node(intent::build_node(Arc::clone(&store), retry_policy.clone()))
        .add_node(fundamental::build_node(Arc::clone(&store), retry_policy.clone()))
        .add_node(news::build_node(Arc::clone(&store), retry_policy.clone()))
        .add_node(technical::build_node(Arc::clone(&store), retry_policy.clone()))
        .add_node(debate::build_node(store, registry, retry_policy))
        .add_edge("intent", "fundamental")
        .add_edge("intent", "news")
        .add_edge("intent", "technical")
        .add_edge("intent", fin_graph::END)
        .add_edge("intent", fin_graph::INTERRUPT)
        .add_edge("fundamental", "debate")
        .add_edge("news", "debate")
        .add_edge("technical", "debate")
        .add_edge("debate", fin_graph::END)
        .with_entry("intent")
        .compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fin_artifacts::InMemoryBlobStore;

    #[test]
    fn the_research_graph_compiles() {
        let store = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
        let mut registry = ContractRegistry::new();
        crate::contracts::register_contracts(&mut registry).unwrap();
        let result = build_graph(store, Arc::new(registry), RetryPolicy::default());
        assert!(result.is_ok());
    }
}
