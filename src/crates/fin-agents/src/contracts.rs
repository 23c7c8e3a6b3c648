//! `ContractManifest` -- the process-wide wiring of every artifact kind
//! this workspace produces or consumes, and the cross-agent allow-list.
//! Built once at startup and handed to the scheduler alongside the
//! compiled graph.

use crate::types::{DebateVerdict, FinancialReports, IntentResolution, NewsItemsList, TechnicalFullReport};
use fin_contracts::{ContractRegistry, RecordField, Result, Schema};

fn traced_number_schema() -> Schema {
    Schema::Traceable(Box::new(Schema::Number { min: None, max: None }))
}

fn intent_schema() -> Schema {
    Schema::Record {
        fields: vec![
            RecordField::required("raw_query", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("resolved_symbol", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("candidates", Schema::Sequence(Box::new(Schema::String { min_len: None, max_len: None }))),
        ],
        passthrough: false,
    }
}

fn fundamental_schema() -> Schema {
    Schema::Record {
        fields: vec![
            RecordField::required("symbol", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("eps", traced_number_schema()),
            RecordField::required("pe_ratio", traced_number_schema()),
            RecordField::required("revenue_growth_pct", traced_number_schema()),
        ],
        passthrough: false,
    }
}

fn news_item_schema() -> Schema {
    Schema::Record {
        fields: vec![
            RecordField::required("id", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("title", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("sentiment", Schema::Enum(vec!["bullish".into(), "bearish".into(), "neutral".into()])),
            RecordField::required("published_at", Schema::String { min_len: None, max_len: None }),
        ],
        passthrough: false,
    }
}

fn news_schema() -> Schema {
    Schema::Record {
        fields: vec![
            RecordField::required("symbol", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("news_items", Schema::Sequence(Box::new(news_item_schema()))),
        ],
        passthrough: false,
    }
}

fn technical_schema() -> Schema {
    Schema::Record {
        fields: vec![
            RecordField::required("symbol", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("trend", Schema::Enum(vec!["uptrend".into(), "downtrend".into(), "sideways".into()])),
            RecordField::required("rsi_14", Schema::Number { min: Some(0.0), max: Some(100.0) }),
            RecordField::required("support_levels", Schema::Sequence(Box::new(Schema::Number { min: None, max: None }))),
            RecordField::required("resistance_levels", Schema::Sequence(Box::new(Schema::Number { min: None, max: None }))),
        ],
        passthrough: false,
    }
}

fn debate_schema() -> Schema {
    Schema::Record {
        fields: vec![
            RecordField::required("symbol", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("call", Schema::Enum(vec!["buy".into(), "sell".into(), "hold".into()])),
            RecordField::required("rationale", Schema::String { min_len: Some(1), max_len: None }),
            RecordField::required("dissent", Schema::Sequence(Box::new(Schema::String { min_len: None, max_len: None }))),
        ],
        passthrough: false,
    }
}

pub const AGENT_INTENT: &str = "intent";
pub const AGENT_FUNDAMENTAL: &str = "fundamental";
pub const AGENT_NEWS: &str = "news";
pub const AGENT_TECHNICAL: &str = "technical";
pub const AGENT_DEBATE: &str = "debate";

pub const KIND_INTENT: &str = "intent.resolution";
pub const KIND_FUNDAMENTAL: &str = "fundamental.financial_reports";
pub const KIND_NEWS: &str = "news.items_list";
pub const KIND_TECHNICAL: &str = "technical.full_report";
pub const KIND_DEBATE: &str = "debate.verdict";

/// Register every kind this workspace's agents produce or consume, and
/// the consumer/producer allow-list the debate agent reads its inputs
/// under. Fatal (returns `Err`) if called twice against the same
/// registry -- this is startup-only wiring.
pub fn register_contracts(registry: &mut ContractRegistry) -> Result<()> {
    registry.register::<IntentResolution>(KIND_INTENT, "v1", intent_schema(), false)?;
    registry.register::<FinancialReports>(KIND_FUNDAMENTAL, "v1", fundamental_schema(), false)?;
    registry.register::<NewsItemsList>(KIND_NEWS, "v1", news_schema(), true)?;
    registry.register::<TechnicalFullReport>(KIND_TECHNICAL, "v1", technical_schema(), false)?;
    registry.register::<DebateVerdict>(KIND_DEBATE, "v1", debate_schema(), true)?;

    registry.allow_consumption(AGENT_DEBATE, AGENT_FUNDAMENTAL, KIND_FUNDAMENTAL);
    registry.allow_consumption(AGENT_DEBATE, AGENT_NEWS, KIND_NEWS);
    registry.allow_consumption(AGENT_DEBATE, AGENT_TECHNICAL, KIND_TECHNICAL);
    registry.allow_consumption(AGENT_FUNDAMENTAL, AGENT_INTENT, KIND_INTENT);
    registry.allow_consumption(AGENT_NEWS, AGENT_INTENT, KIND_INTENT);
    registry.allow_consumption(AGENT_TECHNICAL, AGENT_INTENT, KIND_INTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registering_twice_is_rejected() {
        let mut registry = ContractRegistry::new();
        register_contracts(&mut registry).unwrap();
        assert!(register_contracts(&mut registry).is_err());
    }

    #[test]
    fn fundamental_payload_round_trips_through_the_registry() {
        let mut registry = ContractRegistry::new();
        register_contracts(&mut registry).unwrap();

        let raw = json!({
            "symbol": "GOOG",
            "eps": {"value": 5.8, "provenance": "10-K", "source": "fundamental", "confidence": 0.9},
            "pe_ratio": {"value": 28.4, "provenance": "10-K", "source": "fundamental", "confidence": 0.9},
            "revenue_growth_pct": {"value": 12.1, "provenance": "10-K", "source": "fundamental", "confidence": 0.8},
        });
        let typed = registry.parse(KIND_FUNDAMENTAL, "v1", &raw).unwrap();
        let (kind, version, data) = registry.serialize(&typed).unwrap();
        assert_eq!(kind, KIND_FUNDAMENTAL);
        assert_eq!(version, "v1");
        assert_eq!(data["symbol"], "GOOG");
    }

    #[test]
    fn debate_may_consume_news_but_not_an_unregistered_kind() {
        let mut registry = ContractRegistry::new();
        register_contracts(&mut registry).unwrap();
        assert!(registry.authorize(AGENT_DEBATE, AGENT_NEWS, KIND_NEWS).is_ok());
        assert!(registry.authorize(AGENT_DEBATE, AGENT_NEWS, KIND_TECHNICAL).is_err());
        assert!(registry.authorize(AGENT_FUNDAMENTAL, AGENT_DEBATE, KIND_DEBATE).is_err());
    }
}
