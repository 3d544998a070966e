use serde::{Deserialize, Serialize};

/// Aggregated open interest OHLC for one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenInterestPoint {
    pub symbol: String,
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
