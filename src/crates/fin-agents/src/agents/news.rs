//! News agent: publishes a handful of sentiment-tagged headlines for
//! the resolved symbol. Headline generation is synthetic (see
//! [`crate::synth`]) -- wiring a real news feed is out of scope here.

use crate::contracts::{AGENT_NEWS, KIND_NEWS};
use crate::diff::artifact_pointer;
use crate::error::{node_failed, AgentError};
use crate::state::{resolved_symbol, thread_id};
use crate::synth::news_items;
use crate::types::{NewsItem, NewsItemsList};
use crate::view::news_view;
use chrono::Utc;
use fin_artifacts::{ArtifactStore, TypedArtifactPort};
use fin_graph::{Command, Node, RetryPolicy};
use serde_json::Value;
use std::sync::Arc;

const NODE_ID: &str = "news";
const HEADLINE_COUNT: usize = 3;

#[tracing::instrument(skip(store, input))]
async fn run(store: Arc<ArtifactStore>, input: Value) -> crate::error::Result<Command> {
    let symbol = resolved_symbol(&input)?;
    let tid = thread_id(&input)?;

    let synthetic = news_items(&symbol, HEADLINE_COUNT);
    let list = NewsItemsList {
        symbol: symbol.clone(),
        news_items: synthetic
            .into_iter()
            .enumerate()
            .map(|(i, item)| NewsItem {
                id: format!("{symbol}-{i}"),
                title: item.title,
                sentiment: item.sentiment.to_string(),
                published_at: Utc::now(),
            })
            .collect(),
    };

    let port = TypedArtifactPort::<NewsItemsList>::new(store, KIND_NEWS, "v1", AGENT_NEWS);
    let reference = port.publish(&tid, &list).await.map_err(AgentError::from)?;
    let output = news_view(&list, reference);

    let diff = crate::diff::namespaced(
        AGENT_NEWS,
        artifact_pointer(&output.reference.as_ref().expect("publish always sets reference").artifact_id, KIND_NEWS, serde_json::json!({})),
    );

    Ok(Command::goto("debate").with_update(diff).with_output(&output))
}

pub fn build_node(store: Arc<ArtifactStore>, retry_policy: RetryPolicy) -> Node {
    Node {
        node_id: NODE_ID.to_string(),
        agent_id: AGENT_NEWS.to_string(),
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
    async fn publishes_the_requested_number_of_headlines() {
        let store = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
        let input = json!({"thread_id": "t1", "intent": {"resolved_symbol": "TSLA"}});
        let cmd = run(store, input).await.unwrap();
        assert_eq!(cmd.targets(), vec!["debate".to_string()]);
    }
}
