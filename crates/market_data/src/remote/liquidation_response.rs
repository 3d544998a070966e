use common::models::LiquidationPoint;
use serde::Deserialize;

use crate::normalizer::NormalizeError;
use crate::remote::wire::{f64_from_wire, millis_from_wire};
use crate::traits::{RecordContext, RemoteResponse};

#[derive(Deserialize, Debug)]
pub struct LiquidationRecord {
    #[serde(deserialize_with = "millis_from_wire")]
    pub time: i64,
    #[serde(
        rename(deserialize = "aggregated_long_liquidation_usd"),
        deserialize_with = "f64_from_wire"
    )]
    pub long_liquidation_usd: f64,
    #[serde(
        rename(deserialize = "aggregated_short_liquidation_usd"),
        deserialize_with = "f64_from_wire"
    )]
    pub short_liquidation_usd: f64,
}

impl RemoteResponse<LiquidationPoint> for LiquidationRecord {
    fn to_insertable(self, ctx: &RecordContext<'_>) -> Result<LiquidationPoint, NormalizeError> {
        Ok(LiquidationPoint {
            symbol: ctx.symbol.to_string(),
            time: self.time,
            long_liquidation_usd: self.long_liquidation_usd,
            short_liquidation_usd: self.short_liquidation_usd,
        })
    }
}
