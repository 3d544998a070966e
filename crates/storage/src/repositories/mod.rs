pub mod funding_rate_repo;
pub mod liquidation_repo;
pub mod long_short_ratio_repo;
pub mod openinterest_repo;
pub mod raw_data_repo;

pub use funding_rate_repo::FundingRateRepository;
pub use liquidation_repo::LiquidationRepository;
pub use long_short_ratio_repo::LongShortRatioRepository;
pub use openinterest_repo::OpenInterestRepository;
pub use raw_data_repo::RawDataRepository;
