//! Deterministic synthetic research data, derived from a symbol's
//! content hash rather than any external market or news feed -- wiring
//! a real data provider is out of scope here. Same symbol, same thread,
//! same numbers every time; that determinism is what makes the research
//! agents' tests reproducible without mocking an HTTP client.

use fin_tooling::hash::content_hash;

/// Turn a hex digest into `count` floats in `[0.0, 1.0)`, each derived
/// from a disjoint byte window so they don't correlate trivially.
fn unit_floats(seed: &str, count: usize) -> Vec<f64> {
    let digest = content_hash(&[seed.as_bytes()]);
    let bytes = digest.as_bytes();
    (0..count)
        .map(|i| {
            let window = &bytes[(i * 4) % (bytes.len() - 4)..][..4];
            let n: u32 = window.iter().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(*b as u32));
            (n % 10_000) as f64 / 10_000.0
        })
        .collect()
}

pub struct FundamentalFigures {
    pub eps: f64,
    pub pe_ratio: f64,
    pub revenue_growth_pct: f64,
}

pub fn fundamental_figures(symbol: &str) -> FundamentalFigures {
    let f = unit_floats(&format!("fundamental:{symbol}"), 3);
    FundamentalFigures {
        eps: (f[0] * 10.0 + 0.5).round_to(2),
        pe_ratio: (f[1] * 40.0 + 5.0).round_to(2),
        revenue_growth_pct: (f[2] * 30.0 - 5.0).round_to(2),
    }
}

pub struct TechnicalFigures {
    pub trend: &'static str,
    pub rsi_14: f64,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
}

pub fn technical_figures(symbol: &str) -> TechnicalFigures {
    let f = unit_floats(&format!("technical:{symbol}"), 4);
    let rsi_14 = (f[0] * 100.0).round_to(1);
    let trend = if rsi_14 > 60.0 {
        "uptrend"
    } else if rsi_14 < 40.0 {
        "downtrend"
    } else {
        "sideways"
    };
    let base = 50.0 + f[1] * 150.0;
    TechnicalFigures {
        trend,
        rsi_14,
        support_levels: vec![(base * 0.92).round_to(2), (base * 0.85).round_to(2)],
        resistance_levels: vec![(base * 1.08).round_to(2), (base * 1.15).round_to(2)],
    }
}

pub struct SyntheticNewsItem {
    pub title: String,
    pub sentiment: &'static str,
}

pub fn news_items(symbol: &str, count: usize) -> Vec<SyntheticNewsItem> {
    let f = unit_floats(&format!("news:{symbol}"), count.max(1));
    let headlines = [
        "beats quarterly estimates",
        "announces new product line",
        "faces regulatory scrutiny",
        "expands into new markets",
        "reports slowing user growth",
    ];
    f.into_iter()
        .take(count)
        .enumerate()
        .map(|(i, v)| {
            let sentiment = if v > 0.6 {
                "bullish"
            } else if v < 0.35 {
                "bearish"
            } else {
                "neutral"
            };
            SyntheticNewsItem { title: format!("{symbol} {}", headlines[i % headlines.len()]), sentiment }
        })
        .collect()
}

trait RoundTo {
    fn round_to(self, places: i32) -> f64;
}

impl RoundTo for f64 {
    fn round_to(self, places: i32) -> f64 {
        let factor = 10f64.powi(places);
        (self * factor).round() / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_same_symbol_always_produces_the_same_figures() {
        let a = fundamental_figures("GOOG");
        let b = fundamental_figures("GOOG");
        assert_eq!(a.eps, b.eps);
        assert_eq!(a.pe_ratio, b.pe_ratio);
    }

    #[test]
    fn different_symbols_diverge() {
        let a = fundamental_figures("GOOG");
        let b = fundamental_figures("AAPL");
        assert!(a.eps != b.eps || a.pe_ratio != b.pe_ratio);
    }

    #[test]
    fn rsi_stays_within_the_valid_range() {
        let figures = technical_figures("MSFT");
        assert!((0.0..=100.0).contains(&figures.rsi_14));
    }

    #[test]
    fn news_items_produces_the_requested_count() {
        let items = news_items("TSLA", 3);
        assert_eq!(items.len(), 3);
    }
}
