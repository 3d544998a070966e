//! Request builders, one per data category, plus the catalog of
//! parameter-free endpoints snapshotted as raw JSON.
//!
//! The hobbyist tier only serves 4h and coarser intervals. Nothing here
//! checks that; a finer interval is rejected upstream as an API error.

use common::config::DEFAULT_INTERVAL;
use common::models::Category;

pub const OPEN_INTEREST_PATH: &str = "/futures/open-interest/aggregated-history";
pub const FUNDING_RATE_PATH: &str = "/futures/funding-rate/oi-weight-history";
pub const TOP_ACCOUNT_RATIO_PATH: &str = "/futures/top-long-short-account-ratio/history";
pub const GLOBAL_ACCOUNT_RATIO_PATH: &str = "/futures/global-long-short-account-ratio/history";
pub const LIQUIDATION_PATH: &str = "/futures/liquidation/aggregated-history";

/// Endpoints that need no parameters and are open to the hobbyist tier.
pub const ADDITIONAL_ENDPOINTS: &[(&str, &str)] = &[
    ("futures_supported_coins", "/futures/supported-coins"),
    ("futures_supported_exchange_pairs", "/futures/supported-exchange-pairs"),
    ("spot_supported_coins", "/spot/supported-coins"),
    ("spot_supported_exchange_pairs", "/spot/supported-exchange-pairs"),
    ("liquidation_coin_list", "/futures/liquidation/coin-list"),
];

pub fn additional_endpoint(name: &str) -> Option<&'static str> {
    ADDITIONAL_ENDPOINTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, path)| *path)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    pub path: &'static str,
    pub params: Vec<(String, String)>,
}

impl EndpointRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Symbol, interval and optional time window shared by every history endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    pub symbol: String,
    pub interval: String,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl HistoryQuery {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: DEFAULT_INTERVAL.to_string(),
            start_time: None,
            end_time: None,
        }
    }

    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    pub fn range(mut self, start_time: Option<i64>, end_time: Option<i64>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    fn base_params(&self) -> Vec<(String, String)> {
        vec![
            ("symbol".to_string(), self.symbol.clone()),
            ("interval".to_string(), self.interval.clone()),
        ]
    }

    // Zero and None both mean "full history".
    fn push_range(&self, params: &mut Vec<(String, String)>) {
        if let Some(start) = self.start_time.filter(|t| *t != 0) {
            params.push(("start_time".to_string(), start.to_string()));
        }
        if let Some(end) = self.end_time.filter(|t| *t != 0) {
            params.push(("end_time".to_string(), end.to_string()));
        }
    }

    fn request(&self, path: &'static str) -> EndpointRequest {
        let mut params = self.base_params();
        self.push_range(&mut params);
        EndpointRequest { path, params }
    }
}

pub fn open_interest(query: &HistoryQuery) -> EndpointRequest {
    query.request(OPEN_INTEREST_PATH)
}

pub fn funding_rate(query: &HistoryQuery) -> EndpointRequest {
    query.request(FUNDING_RATE_PATH)
}

/// There is no cross-exchange aggregate for account ratios, so `exchange`
/// is always sent.
pub fn long_short_ratio(
    query: &HistoryQuery,
    exchange: &str,
    top_accounts: bool,
) -> EndpointRequest {
    let path = if top_accounts {
        TOP_ACCOUNT_RATIO_PATH
    } else {
        GLOBAL_ACCOUNT_RATIO_PATH
    };
    let mut params = query.base_params();
    params.push(("exchangeName".to_string(), exchange.to_string()));
    query.push_range(&mut params);
    EndpointRequest { path, params }
}

pub fn liquidation(query: &HistoryQuery) -> EndpointRequest {
    query.request(LIQUIDATION_PATH)
}

pub fn for_category(category: Category, query: &HistoryQuery, exchange: &str) -> EndpointRequest {
    match category {
        Category::OpenInterest => open_interest(query),
        Category::FundingRate => funding_rate(query),
        Category::LongShortRatio(ratio) => {
            long_short_ratio(query, exchange, ratio.is_top_accounts())
        }
        Category::Liquidation => liquidation(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::RatioCategory;

    #[test]
    fn defaults_to_four_hour_full_history() {
        let request = open_interest(&HistoryQuery::new("BTC"));
        assert_eq!(request.path, OPEN_INTEREST_PATH);
        assert_eq!(request.param("symbol"), Some("BTC"));
        assert_eq!(request.param("interval"), Some("4h"));
        assert_eq!(request.param("start_time"), None);
        assert_eq!(request.param("end_time"), None);
        assert_eq!(request.params.len(), 2);
    }

    #[test]
    fn time_window_is_sent_only_when_set() {
        let query = HistoryQuery::new("ETH")
            .interval("1d")
            .range(Some(1_700_000_000_000), Some(0));
        let request = funding_rate(&query);

        assert_eq!(request.path, FUNDING_RATE_PATH);
        assert_eq!(request.param("interval"), Some("1d"));
        assert_eq!(request.param("start_time"), Some("1700000000000"));
        assert_eq!(request.param("end_time"), None);
    }

    #[test]
    fn ratio_path_follows_top_accounts_flag() {
        let query = HistoryQuery::new("BTC");

        let top = long_short_ratio(&query, "Binance", true);
        assert_eq!(top.path, TOP_ACCOUNT_RATIO_PATH);
        assert_eq!(top.param("exchangeName"), Some("Binance"));

        let global = long_short_ratio(&query, "OKX", false);
        assert_eq!(global.path, GLOBAL_ACCOUNT_RATIO_PATH);
        assert_eq!(global.param("exchangeName"), Some("OKX"));
    }

    #[test]
    fn category_dispatch_picks_matching_builder() {
        let query = HistoryQuery::new("BTC").range(Some(1), Some(2));
        assert_eq!(
            for_category(Category::Liquidation, &query, "Binance").path,
            LIQUIDATION_PATH
        );
        assert_eq!(
            for_category(
                Category::LongShortRatio(RatioCategory::Global),
                &query,
                "Binance"
            )
            .path,
            GLOBAL_ACCOUNT_RATIO_PATH
        );
        // Exchange only travels with the ratio endpoints.
        assert_eq!(
            for_category(Category::OpenInterest, &query, "Binance").param("exchangeName"),
            None
        );
    }

    #[test]
    fn catalog_lookup() {
        assert_eq!(
            additional_endpoint("futures_supported_coins"),
            Some("/futures/supported-coins")
        );
        assert_eq!(additional_endpoint("etf_bitcoin_list"), None);
    }
}
