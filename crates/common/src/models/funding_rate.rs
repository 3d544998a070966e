use serde::{Deserialize, Serialize};

/// Open-interest weighted funding rate OHLC for one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRatePoint {
    pub symbol: String,
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
