//! Technical research agent: publishes a trend classification, RSI, and
//! support/resistance bands for the resolved symbol. Figure generation
//! is synthetic (see [`crate::synth`]) -- wiring a real price-history
//! provider is out of scope here.

use crate::contracts::{AGENT_TECHNICAL, KIND_TECHNICAL};
use crate::diff::artifact_pointer;
use crate::error::{node_failed, AgentError};
use crate::state::{resolved_symbol, thread_id};
use crate::synth::technical_figures;
use crate::types::TechnicalFullReport;
use crate::view::technical_view;
use fin_artifacts::{ArtifactStore, TypedArtifactPort};
use fin_graph::{Command, Node, RetryPolicy};
use serde_json::Value;
use std::sync::Arc;

const NODE_ID: &str = "technical";

#[tracing::instrument(skip(store, input))]
async fn run(store: Arc<ArtifactStore>, input: Value) -> crate::error::Result<Command> {
    let symbol = resolved_symbol(&input)?;
    let tid = thread_id(&input)?;

    let figures = technical_figures(&symbol);
    let report = TechnicalFullReport {
        symbol: symbol.clone(),
        trend: figures.trend.to_string(),
        rsi_14: figures.rsi_14,
        support_levels: figures.support_levels,
        resistance_levels: figures.resistance_levels,
    };

    let port = TypedArtifactPort::<TechnicalFullReport>::new(store, KIND_TECHNICAL, "v1", AGENT_TECHNICAL);
    let reference = port.publish(&tid, &report).await.map_err(AgentError::from)?;
    let output = technical_view(&report, reference);

    let diff = crate::diff::namespaced(
        AGENT_TECHNICAL,
        artifact_pointer(&output.reference.as_ref().expect("publish always sets reference").artifact_id, KIND_TECHNICAL, serde_json::json!({})),
    );

    Ok(Command::goto("debate").with_update(diff).with_output(&output))
}

pub fn build_node(store: Arc<ArtifactStore>, retry_policy: RetryPolicy) -> Node {
    Node {
        node_id: NODE_ID.to_string(),
        agent_id: AGENT_TECHNICAL.to_string(),
        retry_policy,
        run: Arc::new(move |input: Value| {
            let store = Arc::clone(&store);
            Box::pin(async move { run(store, input).await.map_err(|e| node_failed(NODE_ID, e)) })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fin_artifacts::InMemoryBlobStore;
    use serde_json::json;

    #[tokio::test]
    async fn publishes_a_trend_within_the_known_categories() {
        let store = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
        let input = json!({"thread_id": "t1", "intent": {"resolved_symbol": "NVDA"}});
        let cmd = run(store, input).await.unwrap();
        assert_eq!(cmd.targets(), vec!["debate".to_string()]);
    }
}
