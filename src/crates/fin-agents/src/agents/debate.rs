//! Debate agent: the pipeline's join point. Fetches the three upstream
//! artifacts, reconciles them into a single call, and ends the run.
//! Reconciliation is a fixed majority rule -- weighing analyst
//! disagreement is explicitly out of scope, only the fan-in/contract-
//! enforcement plumbing is this agent's job.

use crate::contracts::{
    AGENT_DEBATE, AGENT_FUNDAMENTAL, AGENT_NEWS, AGENT_TECHNICAL, KIND_DEBATE, KIND_FUNDAMENTAL, KIND_NEWS,
    KIND_TECHNICAL,
};
use crate::diff::namespaced;
use crate::error::{node_failed, AgentError};
use crate::state::{resolved_symbol, thread_id, upstream_artifact_id};
use crate::types::{DebateVerdict, FinancialReports, NewsItemsList, TechnicalFullReport};
use crate::view::debate_view;
use fin_artifacts::{ArtifactStore, TypedArtifactPort};
use fin_contracts::ContractRegistry;
use fin_graph::{Command, Node, RetryPolicy};
use serde_json::Value;
use std::sync::Arc;

const NODE_ID: &str = "debate";

fn news_sentiment_majority(news: &NewsItemsList) -> &'static str {
    let bullish = news.news_items.iter().filter(|n| n.sentiment == "bullish").count();
    let bearish = news.news_items.iter().filter(|n| n.sentiment == "bearish").count();
    if bullish > bearish {
        "bullish"
    } else if bearish > bullish {
        "bearish"
    } else {
        "neutral"
    }
}

fn reconcile(fundamentals: &FinancialReports, news: &NewsItemsList, technical: &TechnicalFullReport) -> (String, String, Vec<String>) {
    let sentiment = news_sentiment_majority(news);
    let mut dissent = Vec::new();

    let call = if technical.trend == "uptrend" && sentiment != "bearish" {
        "buy"
    } else if technical.trend == "downtrend" && sentiment != "bullish" {
        "sell"
    } else {
        "hold"
    };

    if technical.trend == "uptrend" && sentiment == "bearish" {
        dissent.push("technical signals an uptrend while news sentiment is bearish".to_string());
    }
    if technical.trend == "downtrend" && sentiment == "bullish" {
        dissent.push("technical signals a downtrend while news sentiment is bullish".to_string());
    }
    if fundamentals.pe_ratio.value > 35.0 && call == "buy" {
        dissent.push(format!("p/e of {:.1} is elevated for a buy call", fundamentals.pe_ratio.value));
    }

    let rationale = format!(
        "{} trend ({:.1} rsi) with {} news sentiment and {:.1}% revenue growth",
        technical.trend, technical.rsi_14, sentiment, fundamentals.revenue_growth_pct.value
    );

    (call.to_string(), rationale, dissent)
}

#[tracing::instrument(skip(store, registry, input))]
async fn run(store: Arc<ArtifactStore>, registry: Arc<ContractRegistry>, input: Value) -> crate::error::Result<Command> {
    let symbol = resolved_symbol(&input)?;
    let tid = thread_id(&input)?;

    registry.authorize(AGENT_DEBATE, AGENT_FUNDAMENTAL, KIND_FUNDAMENTAL).map_err(AgentError::from)?;
    registry.authorize(AGENT_DEBATE, AGENT_NEWS, KIND_NEWS).map_err(AgentError::from)?;
    registry.authorize(AGENT_DEBATE, AGENT_TECHNICAL, KIND_TECHNICAL).map_err(AgentError::from)?;

    let fundamental_port = TypedArtifactPort::<FinancialReports>::new(Arc::clone(&store), KIND_FUNDAMENTAL, "v1", AGENT_DEBATE);
    let news_port = TypedArtifactPort::<NewsItemsList>::new(Arc::clone(&store), KIND_NEWS, "v1", AGENT_DEBATE);
    let technical_port = TypedArtifactPort::<TechnicalFullReport>::new(Arc::clone(&store), KIND_TECHNICAL, "v1", AGENT_DEBATE);

    let fundamental = fundamental_port.fetch(&upstream_artifact_id(&input, AGENT_FUNDAMENTAL)?).await.map_err(AgentError::from)?;
    let news = news_port.fetch(&upstream_artifact_id(&input, AGENT_NEWS)?).await.map_err(AgentError::from)?;
    let technical = technical_port.fetch(&upstream_artifact_id(&input, AGENT_TECHNICAL)?).await.map_err(AgentError::from)?;

    let (call, rationale, dissent) = reconcile(&fundamental, &news, &technical);
    let verdict = DebateVerdict { symbol, call, rationale, dissent };

    let verdict_port = TypedArtifactPort::<DebateVerdict>::new(store, KIND_DEBATE, "v1", AGENT_DEBATE);
    let reference = verdict_port.publish(&tid, &verdict).await.map_err(AgentError::from)?;
    let output = debate_view(&verdict, reference);

    let diff = namespaced(AGENT_DEBATE, serde_json::json!({ "call": verdict.call, "dissent": verdict.dissent }));

    Ok(Command::end().with_update(diff).with_output(&output))
}

pub fn build_node(store: Arc<ArtifactStore>, registry: Arc<ContractRegistry>, retry_policy: RetryPolicy) -> Node {
    Node {
        node_id: NODE_ID.to_string(),
        agent_id: AGENT_DEBATE.to_string(),
        retry_policy,
        run: Arc::new(move |input: Value| {
            let store = Arc::clone(&store);
            let registry = Arc::clone(&registry);
            Box::pin(async move { run(store, registry, input).await.map_err(|e| node_failed(NODE_ID, e)) })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewsItem, Traced};
    use chrono::Utc;
    use fin_artifacts::InMemoryBlobStore;

    fn sample_fundamentals() -> FinancialReports {
        FinancialReports {
            symbol: "GOOG".into(),
            eps: Traced::new(5.0, "x", "fundamental", 0.8),
            pe_ratio: Traced::new(20.0, "x", "fundamental", 0.8),
            revenue_growth_pct: Traced::new(10.0, "x", "fundamental", 0.8),
        }
    }

    fn sample_news(sentiment: &'static str) -> NewsItemsList {
        NewsItemsList {
            symbol: "GOOG".into(),
            news_items: vec![NewsItem {
                id: "1".into(),
                title: "headline".into(),
                sentiment: sentiment.into(),
                published_at: Utc::now(),
            }],
        }
    }

    fn sample_technical(trend: &'static str) -> TechnicalFullReport {
        TechnicalFullReport {
            symbol: "GOOG".into(),
            trend: trend.into(),
            rsi_14: 65.0,
            support_levels: vec![90.0],
            resistance_levels: vec![110.0],
        }
    }

    #[test]
    fn an_uptrend_with_non_bearish_sentiment_calls_buy() {
        let (call, _, dissent) = reconcile(&sample_fundamentals(), &sample_news("bullish"), &sample_technical("uptrend"));
        assert_eq!(call, "buy");
        assert!(dissent.is_empty());
    }

    #[test]
    fn conflicting_signals_surface_as_dissent_but_still_produce_a_call() {
        let (call, _, dissent) = reconcile(&sample_fundamentals(), &sample_news("bearish"), &sample_technical("uptrend"));
        assert_eq!(call, "hold");
        assert!(!dissent.is_empty());
    }

    #[tokio::test]
    async fn the_pipeline_rejects_a_consumer_not_on_the_allow_list() {
        let store = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
        let registry = Arc::new(ContractRegistry::new());
        let input = serde_json::json!({"thread_id": "t1", "intent": {"resolved_symbol": "GOOG"}});
        let err = run(store, registry, input).await.unwrap_err();
        assert!(matches!(err, AgentError::Contract(_)));
    }
}
