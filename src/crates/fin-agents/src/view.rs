//! Maps each agent's typed domain value to the `AgentOutputEnvelope`
//! the scheduler publishes as `state.update`. Previews stay small and
//! human-scannable -- the full payload lives in the artifact store,
//! fetched by `artifact_id` when a caller wants it.

use crate::types::{DebateVerdict, FinancialReports, IntentResolution, NewsItemsList, TechnicalFullReport};
use fin_artifacts::ArtifactReference;
use fin_events::AgentOutputEnvelope;
use fin_tooling::Incident;
use serde_json::json;

fn envelope(
    kind: &str,
    version: &str,
    summary: String,
    preview: serde_json::Value,
    reference: ArtifactReference,
) -> AgentOutputEnvelope {
    AgentOutputEnvelope {
        kind: kind.to_string(),
        version: version.to_string(),
        summary,
        preview,
        reference: Some(reference),
        error_logs: Vec::new(),
    }
}

pub fn intent_view(value: &IntentResolution, reference: ArtifactReference) -> AgentOutputEnvelope {
    envelope(
        "intent.resolution",
        "v1",
        format!("resolved {:?} to {}", value.raw_query, value.resolved_symbol),
        json!({ "resolved_symbol": value.resolved_symbol, "candidates": value.candidates }),
        reference,
    )
}

pub fn fundamental_view(value: &FinancialReports, reference: ArtifactReference) -> AgentOutputEnvelope {
    envelope(
        "fundamental.financial_reports",
        "v1",
        format!("{}: eps {:.2}, p/e {:.1}", value.symbol, value.eps.value, value.pe_ratio.value),
        json!({
            "symbol": value.symbol,
            "eps": value.eps.value,
            "pe_ratio": value.pe_ratio.value,
            "revenue_growth_pct": value.revenue_growth_pct.value,
        }),
        reference,
    )
}

pub fn news_view(value: &NewsItemsList, reference: ArtifactReference) -> AgentOutputEnvelope {
    envelope(
        "news.items_list",
        "v1",
        format!("{} headlines for {}", value.news_items.len(), value.symbol),
        json!({
            "symbol": value.symbol,
            "count": value.news_items.len(),
            "headlines": value.news_items.iter().take(3).map(|n| &n.title).collect::<Vec<_>>(),
        }),
        reference,
    )
}

pub fn technical_view(value: &TechnicalFullReport, reference: ArtifactReference) -> AgentOutputEnvelope {
    envelope(
        "technical.full_report",
        "v1",
        format!("{}: {} trend, rsi {:.1}", value.symbol, value.trend, value.rsi_14),
        json!({ "symbol": value.symbol, "trend": value.trend, "rsi_14": value.rsi_14 }),
        reference,
    )
}

pub fn debate_view(value: &DebateVerdict, reference: ArtifactReference) -> AgentOutputEnvelope {
    envelope(
        "debate.verdict",
        "v1",
        format!("{}: {}", value.symbol, value.call),
        json!({ "symbol": value.symbol, "call": value.call, "dissent_count": value.dissent.len() }),
        reference,
    )
}

/// Error-path envelope: no artifact was produced, the agent's incident
/// is surfaced directly so a client can render it without a fetch.
pub fn error_view(kind: &str, version: &str, incident: Incident) -> AgentOutputEnvelope {
    AgentOutputEnvelope {
        kind: kind.to_string(),
        version: version.to_string(),
        summary: incident.message.clone(),
        preview: json!({}),
        reference: None,
        error_logs: vec![incident],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Traced;

    #[test]
    fn fundamental_view_previews_the_headline_ratios() {
        let value = FinancialReports {
            symbol: "GOOG".into(),
            eps: Traced::new(5.8, "10-K", "fundamental", 0.9),
            pe_ratio: Traced::new(28.4, "10-K", "fundamental", 0.9),
            revenue_growth_pct: Traced::new(12.1, "10-K", "fundamental", 0.8),
        };
        let reference = ArtifactReference {
            artifact_id: "abc".into(),
            kind: "fundamental.financial_reports".into(),
            version: "v1".into(),
        };
        let env = fundamental_view(&value, reference);
        assert_eq!(env.preview["eps"], 5.8);
        assert!(env.summary.contains("GOOG"));
    }
}
