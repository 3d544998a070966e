use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationPoint {
    pub symbol: String,
    pub time: i64,
    pub long_liquidation_usd: f64,
    pub short_liquidation_usd: f64,
}
