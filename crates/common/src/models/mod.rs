pub mod category;
pub mod funding_rate;
pub mod liquidation;
pub mod long_short_ratio;
pub mod open_interest;

pub use category::{Category, MetricRows};
pub use funding_rate::FundingRatePoint;
pub use liquidation::LiquidationPoint;
pub use long_short_ratio::{LongShortRatioPoint, RatioCategory};
pub use open_interest::OpenInterestPoint;
