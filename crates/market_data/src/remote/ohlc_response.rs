use common::models::{FundingRatePoint, OpenInterestPoint};
use serde::Deserialize;

use crate::normalizer::NormalizeError;
use crate::remote::wire::{f64_from_wire, millis_from_wire};
use crate::traits::{RecordContext, RemoteResponse};

/// Shared wire shape of the aggregated open interest and OI-weighted funding
/// rate histories.
#[derive(Deserialize, Debug)]
pub struct OhlcRecord {
    #[serde(deserialize_with = "millis_from_wire")]
    pub time: i64,
    #[serde(deserialize_with = "f64_from_wire")]
    pub open: f64,
    #[serde(deserialize_with = "f64_from_wire")]
    pub high: f64,
    #[serde(deserialize_with = "f64_from_wire")]
    pub low: f64,
    #[serde(deserialize_with = "f64_from_wire")]
    pub close: f64,
}

impl RemoteResponse<OpenInterestPoint> for OhlcRecord {
    fn to_insertable(self, ctx: &RecordContext<'_>) -> Result<OpenInterestPoint, NormalizeError> {
        Ok(OpenInterestPoint {
            symbol: ctx.symbol.to_string(),
            time: self.time,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
        })
    }
}

impl RemoteResponse<FundingRatePoint> for OhlcRecord {
    fn to_insertable(self, ctx: &RecordContext<'_>) -> Result<FundingRatePoint, NormalizeError> {
        Ok(FundingRatePoint {
            symbol: ctx.symbol.to_string(),
            time: self.time,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
        })
    }
}
