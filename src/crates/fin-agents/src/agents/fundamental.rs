//! Fundamental research agent: publishes EPS, P/E, and revenue-growth
//! figures for the resolved symbol. Figure generation is synthetic
//! (see [`crate::synth`]) -- wiring a real filings provider is out of
//! scope here.

use crate::contracts::{AGENT_FUNDAMENTAL, KIND_FUNDAMENTAL};
use crate::diff::artifact_pointer;
use crate::error::{node_failed, AgentError};
use crate::state::{resolved_symbol, thread_id};
use crate::synth::fundamental_figures;
use crate::types::{FinancialReports, Traced};
use crate::view::fundamental_view;
use fin_artifacts::{ArtifactStore, TypedArtifactPort};
use fin_graph::{Command, Node, RetryPolicy};
use serde_json::Value;
use std::sync::Arc;

const NODE_ID: &str = "fundamental";

#[tracing::instrument(skip(store, input))]
async fn run(store: Arc<ArtifactStore>, input: Value) -> crate::error::Result<Command> {
    let symbol = resolved_symbol(&input)?;
    let tid = thread_id(&input)?;

    let figures = fundamental_figures(&symbol);
    let report = FinancialReports {
        symbol: symbol.clone(),
        eps: Traced::new(figures.eps, "synthetic-filing", AGENT_FUNDAMENTAL, 0.7),
        pe_ratio: Traced::new(figures.pe_ratio, "synthetic-filing", AGENT_FUNDAMENTAL, 0.7),
        revenue_growth_pct: Traced::new(figures.revenue_growth_pct, "synthetic-filing", AGENT_FUNDAMENTAL, 0.6),
    };

    let port = TypedArtifactPort::<FinancialReports>::new(store, KIND_FUNDAMENTAL, "v1", AGENT_FUNDAMENTAL);
    let reference = port.publish(&tid, &report).await.map_err(AgentError::from)?;
    let output = fundamental_view(&report, reference);

    let diff = crate::diff::namespaced(
        AGENT_FUNDAMENTAL,
        artifact_pointer(&output.reference.as_ref().expect("publish always sets reference").artifact_id, KIND_FUNDAMENTAL, serde_json::json!({})),
    );

    Ok(Command::goto("debate").with_update(diff).with_output(&output))
}

pub fn build_node(store: Arc<ArtifactStore>, retry_policy: RetryPolicy) -> Node {
    Node {
        node_id: NODE_ID.to_string(),
        agent_id: AGENT_FUNDAMENTAL.to_string(),
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
    async fn publishes_a_fundamental_artifact_and_writes_its_pointer_to_state() {
        let store = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
        let input = json!({"thread_id": "t1", "intent": {"resolved_symbol": "GOOG"}});
        let cmd = run(store, input).await.unwrap();
        assert_eq!(cmd.targets(), vec!["debate".to_string()]);
        let update = cmd.update.unwrap();
        assert!(update["fundamental"]["artifact_id"].is_string());
    }
}
