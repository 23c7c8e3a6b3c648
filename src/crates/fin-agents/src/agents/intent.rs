//! Intent agent: resolves a user's free-text query down to a single
//! ticker symbol, pausing for human disambiguation when the heuristic
//! can't narrow it to one. Ticker-matching is intentionally dumb --
//! reading what the market actually means by a query is out of scope
//! here, only the resolve-or-ask control flow is this agent's job.

use crate::contracts::{AGENT_INTENT, KIND_INTENT};
use crate::diff::intent_diff;
use crate::error::{node_failed, AgentError};
use crate::state::{raw_query, resume_selected_symbol, thread_id};
use crate::types::IntentResolution;
use crate::view::intent_view;
use fin_artifacts::{ArtifactStore, TypedArtifactPort};
use fin_events::InterruptRequest;
use fin_graph::{Command, Node, RetryPolicy};
use serde_json::{json, Value};
use std::sync::Arc;

const NODE_ID: &str = "intent";

/// A handful of large-cap tickers the heuristic recognizes directly.
/// Anything outside this list that still looks ticker-shaped becomes a
/// disambiguation candidate rather than a guess.
const KNOWN_TICKERS: &[&str] = &["GOOG", "GOOGL", "AAPL", "MSFT", "AMZN", "META", "NVDA", "TSLA"];

/// Share classes of the same company. Mentioning one ticker in a group
/// is treated as ambiguous over the whole group, since the query never
/// said which class it meant.
const SHARE_CLASS_GROUPS: &[&[&str]] = &[&["GOOG", "GOOGL"]];

fn share_class_aliases(ticker: &str) -> &'static [&'static str] {
    SHARE_CLASS_GROUPS.iter().find(|group| group.contains(&ticker)).copied().unwrap_or(&[])
}

fn extract_candidates(query: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for token in query.split(|c: char| !c.is_ascii_alphabetic()) {
        if token.len() < 2 || token.len() > 5 {
            continue;
        }
        let upper = token.to_ascii_uppercase();
        if KNOWN_TICKERS.contains(&upper.as_str()) && !seen.contains(&upper) {
            seen.push(upper);
        }
    }
    for ticker in seen.clone() {
        for alias in share_class_aliases(&ticker) {
            if !seen.iter().any(|t| t == alias) {
                seen.push(alias.to_string());
            }
        }
    }
    seen
}

fn ticker_selection_request(query: &str, candidates: &[String]) -> InterruptRequest {
    InterruptRequest {
        kind: "ticker_selection".to_string(),
        title: "Which ticker did you mean?".to_string(),
        description: format!("\"{query}\" could refer to more than one symbol"),
        data: json!({ "candidates": candidates }),
        schema: json!({
            "type": "object",
            "properties": { "selected_symbol": { "type": "string", "enum": candidates } },
            "required": ["selected_symbol"],
        }),
        ui_hints: json!({ "widget": "radio" }),
    }
}

#[tracing::instrument(skip(store, input))]
async fn run(store: Arc<ArtifactStore>, input: Value) -> crate::error::Result<Command> {
    let query = raw_query(&input)?;
    let tid = thread_id(&input)?;

    let resolved_symbol = match resume_selected_symbol(&input) {
        Ok(selected) => selected,
        Err(_) => {
            let candidates = extract_candidates(&query);
            match candidates.len() {
                1 => candidates.into_iter().next().expect("len checked above"),
                0 => return Ok(Command::end().with_update(intent_diff("UNRESOLVED", &[]))),
                _ => return Ok(Command::interrupt(&ticker_selection_request(&query, &candidates))),
            }
        }
    };

    let candidates = extract_candidates(&query);
    let resolution = IntentResolution { raw_query: query, resolved_symbol: resolved_symbol.clone(), candidates: candidates.clone() };

    let port = TypedArtifactPort::<IntentResolution>::new(store, KIND_INTENT, "v1", AGENT_INTENT);
    let reference = port.publish(&tid, &resolution).await.map_err(AgentError::from)?;
    let output = intent_view(&resolution, reference);

    Ok(Command::goto(vec!["fundamental".to_string(), "news".to_string(), "technical".to_string()])
        .with_update(intent_diff(&resolved_symbol, &candidates))
        .with_output(&output))
}

pub fn build_node(store: Arc<ArtifactStore>, retry_policy: RetryPolicy) -> Node {
    Node {
        node_id: NODE_ID.to_string(),
        agent_id: AGENT_INTENT.to_string(),
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

    #[test]
    fn a_single_known_ticker_needs_no_disambiguation() {
        assert_eq!(extract_candidates("how's aapl doing this week"), vec!["AAPL".to_string()]);
    }

    #[test]
    fn two_known_tickers_both_surface_as_candidates() {
        let candidates = extract_candidates("compare aapl and msft");
        assert_eq!(candidates, vec!["AAPL".to_string(), "MSFT".to_string()]);
    }

    #[test]
    fn mentioning_one_share_class_pulls_in_its_sibling() {
        assert_eq!(extract_candidates("analyze GOOG"), vec!["GOOG".to_string(), "GOOGL".to_string()]);
        assert_eq!(extract_candidates("analyze googl"), vec!["GOOGL".to_string(), "GOOG".to_string()]);
    }

    #[tokio::test]
    async fn an_unresolvable_query_ends_the_run_without_an_artifact() {
        use fin_artifacts::InMemoryBlobStore;
        let store = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
        let input = json!({"thread_id": "t1", "messages": [{"role": "user", "content": "what do you think of the market"}]});
        let cmd = run(store, input).await.unwrap();
        assert!(cmd.is_end());
    }

    #[tokio::test]
    async fn an_ambiguous_query_interrupts_with_both_candidates_in_the_schema() {
        use fin_artifacts::InMemoryBlobStore;
        let store = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
        let input = json!({"thread_id": "t1", "messages": [{"role": "user", "content": "aapl or msft?"}]});
        let cmd = run(store, input).await.unwrap();
        assert!(cmd.is_interrupt());
    }
}
