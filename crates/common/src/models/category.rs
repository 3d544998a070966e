use std::fmt;

use crate::models::{
    FundingRatePoint, LiquidationPoint, LongShortRatioPoint, OpenInterestPoint, RatioCategory,
};

/// The data categories the collector knows how to fetch and store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    OpenInterest,
    FundingRate,
    LongShortRatio(RatioCategory),
    Liquidation,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenInterest => write!(f, "open interest"),
            Self::FundingRate => write!(f, "funding rate"),
            Self::LongShortRatio(c) => write!(f, "{c} long/short ratio"),
            Self::Liquidation => write!(f, "liquidation"),
        }
    }
}

/// A normalized batch, one variant per table.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricRows {
    OpenInterest(Vec<OpenInterestPoint>),
    FundingRate(Vec<FundingRatePoint>),
    LongShortRatio(Vec<LongShortRatioPoint>),
    Liquidation(Vec<LiquidationPoint>),
}

impl MetricRows {
    pub fn len(&self) -> usize {
        match self {
            Self::OpenInterest(rows) => rows.len(),
            Self::FundingRate(rows) => rows.len(),
            Self::LongShortRatio(rows) => rows.len(),
            Self::Liquidation(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(&self) -> &'static str {
        match self {
            Self::OpenInterest(_) => "open_interest",
            Self::FundingRate(_) => "funding_rate",
            Self::LongShortRatio(_) => "long_short_ratio",
            Self::Liquidation(_) => "liquidations",
        }
    }
}
