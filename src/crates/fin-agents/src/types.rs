//! Concrete artifact payloads for the five registered kinds. Each type
//! is a plain `serde` record -- these cross an agent boundary exactly
//! once, through [`crate::contracts::register_contracts`], and never
//! travel as anything but canonical JSON once they leave the producing
//! agent's own pipeline.

use serde::{Deserialize, Serialize};

/// A value with its provenance, matching the registry's `Traceable`
/// schema wrapper: `{value, provenance, source, confidence}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Traced<T> {
    pub value: T,
    pub provenance: String,
    pub source: String,
    pub confidence: f64,
}

impl<T> Traced<T> {
    pub fn new(value: T, provenance: impl Into<String>, source: impl Into<String>, confidence: f64) -> Self {
        Self { value, provenance: provenance.into(), source: source.into(), confidence }
    }
}

/// `intent.resolution` v1 -- the outcome of the intent agent's subgraph:
/// either a single resolved ticker or the candidates an interrupt asked
/// the user to disambiguate between.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentResolution {
    pub raw_query: String,
    pub resolved_symbol: String,
    pub candidates: Vec<String>,
}

/// `fundamental.financial_reports` v1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialReports {
    pub symbol: String,
    pub eps: Traced<f64>,
    pub pe_ratio: Traced<f64>,
    pub revenue_growth_pct: Traced<f64>,
}

/// `news.items_list` v1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub sentiment: String,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItemsList {
    pub symbol: String,
    pub news_items: Vec<NewsItem>,
}

/// `technical.full_report` v1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechnicalFullReport {
    pub symbol: String,
    pub trend: String,
    pub rsi_14: f64,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
}

/// `debate.verdict` v1 -- the pipeline's terminal artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebateVerdict {
    pub symbol: String,
    pub call: String,
    pub rationale: String,
    pub dissent: Vec<String>,
}
