use common::models::{Category, LongShortRatioPoint};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::normalizer::NormalizeError;
use crate::remote::wire::{millis_from_wire, parse_f64};
use crate::traits::{RecordContext, RemoteResponse};

#[derive(Deserialize, Debug)]
pub struct LongShortRatioRecord {
    #[serde(deserialize_with = "millis_from_wire")]
    pub time: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// The two account-ratio endpoints name the same three values differently.
/// Which naming applies is read off the payload itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountScheme {
    Global,
    Top,
    /// Neither prefix present. Every value falls back to 0.0.
    Absent,
}

impl AccountScheme {
    const GLOBAL_PREFIX: &'static str = "global_account_";
    const TOP_PREFIX: &'static str = "top_account_";

    /// Global keys win when both are present.
    pub fn detect(fields: &Map<String, Value>) -> Self {
        let has = |prefix: &str| fields.keys().any(|k| k.starts_with(prefix));
        if has(Self::GLOBAL_PREFIX) {
            Self::Global
        } else if has(Self::TOP_PREFIX) {
            Self::Top
        } else {
            Self::Absent
        }
    }

    fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::Global => Some(Self::GLOBAL_PREFIX),
            Self::Top => Some(Self::TOP_PREFIX),
            Self::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioValues {
    pub long_percent: f64,
    pub short_percent: f64,
    pub long_short_ratio: f64,
}

impl LongShortRatioRecord {
    pub fn scheme(&self) -> AccountScheme {
        AccountScheme::detect(&self.fields)
    }

    pub fn values(&self, index: usize) -> Result<RatioValues, NormalizeError> {
        let Some(prefix) = self.scheme().prefix() else {
            return Ok(RatioValues {
                long_percent: 0.0,
                short_percent: 0.0,
                long_short_ratio: 0.0,
            });
        };

        Ok(RatioValues {
            long_percent: self.value(index, prefix, "long_percent")?,
            short_percent: self.value(index, prefix, "short_percent")?,
            long_short_ratio: self.value(index, prefix, "long_short_ratio")?,
        })
    }

    // Only an absent key defaults to 0.0; a present value, null included, must parse.
    fn value(&self, index: usize, prefix: &str, suffix: &str) -> Result<f64, NormalizeError> {
        let field = format!("{prefix}{suffix}");
        match self.fields.get(&field) {
            None => Ok(0.0),
            Some(value) => parse_f64(value).map_err(|reason| NormalizeError::InvalidField {
                index,
                field,
                reason,
            }),
        }
    }
}

impl RemoteResponse<LongShortRatioPoint> for LongShortRatioRecord {
    fn to_insertable(self, ctx: &RecordContext<'_>) -> Result<LongShortRatioPoint, NormalizeError> {
        let Category::LongShortRatio(category) = ctx.category else {
            return Err(NormalizeError::CategoryMismatch {
                expected: "long/short ratio",
                got: ctx.category,
            });
        };
        let exchange = ctx.exchange.ok_or(NormalizeError::MissingExchange)?;
        let values = self.values(ctx.index)?;

        Ok(LongShortRatioPoint {
            symbol: ctx.symbol.to_string(),
            exchange: exchange.to_string(),
            time: self.time,
            long_percent: values.long_percent,
            short_percent: values.short_percent,
            long_short_ratio: values.long_short_ratio,
            category,
        })
    }
}
