//! Runtime configuration for the collector, read from the environment.
//!
//! Every knob has a default so a bare `COINGLASS_API_KEY` is enough to run.
//! A missing key is not an error here: the upstream answers 401 and that flows
//! through the normal HTTP error path.

use std::env;

use thiserror::Error;
use url::Url;

use crate::logger::DEFAULT_LOG_FILE;
use crate::models::RatioCategory;

pub const DEFAULT_BASE_URL: &str = "https://open-api-v4.coinglass.com/api";
pub const DEFAULT_DB_PATH: &str = "coinglass_data.db";
/// Coarsest interval the hobbyist tier allows; finer ones are rejected upstream.
pub const DEFAULT_INTERVAL: &str = "4h";
pub const DEFAULT_EXCHANGE: &str = "Binance";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{key} must be an integer in epoch milliseconds, got '{value}'")]
    InvalidTimestamp { key: &'static str, value: String },

    #[error("{key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub db_path: String,
    pub symbols: Vec<String>,
    pub interval: String,
    pub exchange: String,
    pub ratio_categories: Vec<RatioCategory>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub extra_endpoints: Vec<String>,
    pub log_level: String,
    /// `None` logs to the console only.
    pub log_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let api_key = get("COINGLASS_API_KEY").unwrap_or_default();

        let base_url = get("COINGLASS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url).map_err(|source| ConfigError::InvalidUrl {
            key: "COINGLASS_BASE_URL",
            source,
        })?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let symbols = split_list(&get("COINGLASS_SYMBOLS").unwrap_or_else(|| "BTC,ETH".into()));
        if symbols.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "COINGLASS_SYMBOLS",
                message: "at least one symbol is required".into(),
            });
        }

        let ratio_categories = split_list(
            &get("COINGLASS_RATIO_CATEGORIES").unwrap_or_else(|| "top,global".into()),
        )
        .iter()
        .map(|c| c.parse::<RatioCategory>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|message| ConfigError::InvalidValue {
            key: "COINGLASS_RATIO_CATEGORIES",
            message,
        })?;

        let extra_endpoints = split_list(&get("COINGLASS_EXTRA_ENDPOINTS").unwrap_or_else(|| {
            "futures_supported_coins,futures_supported_exchange_pairs".into()
        }));

        Ok(Self {
            api_key,
            base_url,
            db_path: get("COINGLASS_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into()),
            symbols,
            interval: get("COINGLASS_INTERVAL").unwrap_or_else(|| DEFAULT_INTERVAL.into()),
            exchange: get("COINGLASS_EXCHANGE").unwrap_or_else(|| DEFAULT_EXCHANGE.into()),
            ratio_categories,
            start_time: parse_millis("COINGLASS_START_TIME", get("COINGLASS_START_TIME"))?,
            end_time: parse_millis("COINGLASS_END_TIME", get("COINGLASS_END_TIME"))?,
            extra_endpoints,
            log_level: get("COINGLASS_LOG").unwrap_or_else(|| "info".into()),
            log_file: match get("COINGLASS_LOG_FILE") {
                None => Some(DEFAULT_LOG_FILE.to_string()),
                Some(path) if path.is_empty() => None,
                Some(path) => Some(path),
            },
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_millis(key: &'static str, raw: Option<String>) -> Result<Option<i64>, ConfigError> {
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidTimestamp {
                key,
                value: value.to_string(),
            }),
    }
}
