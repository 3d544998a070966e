//! Turns the untyped record lists returned by the client into fixed-shape rows.
//!
//! Numeric fields are coerced from decimal strings. A missing or unparsable
//! required field fails the whole batch. Long/short ratio values are the
//! exception: they default to 0.0 when absent.

use common::models::{Category, MetricRows};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::remote::liquidation_response::LiquidationRecord;
use crate::remote::long_short_response::LongShortRatioRecord;
use crate::remote::ohlc_response::OhlcRecord;
use crate::traits::{RecordContext, RemoteResponse};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed record {index}: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {index}: field '{field}': {reason}")]
    InvalidField {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("long/short ratio records need an exchange")]
    MissingExchange,

    #[error("expected {expected} category, got {got}")]
    CategoryMismatch {
        expected: &'static str,
        got: Category,
    },
}

pub fn normalize(
    category: Category,
    symbol: &str,
    exchange: Option<&str>,
    records: Vec<Value>,
) -> Result<MetricRows, NormalizeError> {
    let base = RecordContext {
        index: 0,
        symbol,
        exchange,
        category,
    };

    let rows = match category {
        Category::OpenInterest => {
            MetricRows::OpenInterest(convert::<OhlcRecord, _>(&base, records)?)
        }
        Category::FundingRate => {
            MetricRows::FundingRate(convert::<OhlcRecord, _>(&base, records)?)
        }
        Category::LongShortRatio(_) => {
            if exchange.is_none() {
                return Err(NormalizeError::MissingExchange);
            }
            MetricRows::LongShortRatio(convert::<LongShortRatioRecord, _>(&base, records)?)
        }
        Category::Liquidation => {
            MetricRows::Liquidation(convert::<LiquidationRecord, _>(&base, records)?)
        }
    };
    Ok(rows)
}

fn convert<R, T>(base: &RecordContext<'_>, records: Vec<Value>) -> Result<Vec<T>, NormalizeError>
where
    R: DeserializeOwned + RemoteResponse<T>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: R = serde_json::from_value(value)
                .map_err(|source| NormalizeError::Malformed { index, source })?;
            record.to_insertable(&RecordContext { index, ..*base })
        })
        .collect()
}
