use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which account-ratio sub-endpoint produced a row. Both share one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioCategory {
    Global,
    Top,
}

impl RatioCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Top => "top",
        }
    }

    pub fn is_top_accounts(&self) -> bool {
        matches!(self, Self::Top)
    }
}

impl fmt::Display for RatioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatioCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "top" => Ok(Self::Top),
            other => Err(format!("unknown ratio category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongShortRatioPoint {
    pub symbol: String,
    pub exchange: String,
    pub time: i64,
    pub long_percent: f64,
    pub short_percent: f64,
    pub long_short_ratio: f64,
    pub category: RatioCategory,
}
