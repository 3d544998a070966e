use anyhow::{Context, bail};
use common::config::Config;
use common::models::{Category, RatioCategory};
use serde_json::json;
use storage::DataManager;
use tracing::{error, info};

use crate::endpoints::{self, HistoryQuery};
use crate::normalizer::normalize;
use crate::remote::coinglass_client::CoinglassClient;
use crate::remote::transport::HttpTransport;

/// What one collection pass fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPlan {
    pub symbols: Vec<String>,
    pub interval: String,
    pub exchange: String,
    pub ratio_categories: Vec<RatioCategory>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    /// Raw snapshot endpoints as (name, path).
    pub extra_endpoints: Vec<(String, &'static str)>,
}

impl CollectionPlan {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut extra_endpoints = Vec::with_capacity(config.extra_endpoints.len());
        for name in &config.extra_endpoints {
            let Some(path) = endpoints::additional_endpoint(name) else {
                bail!("Unknown extra endpoint '{}'", name);
            };
            extra_endpoints.push((name.clone(), path));
        }

        Ok(Self {
            symbols: config.symbols.clone(),
            interval: config.interval.clone(),
            exchange: config.exchange.clone(),
            ratio_categories: config.ratio_categories.clone(),
            start_time: config.start_time,
            end_time: config.end_time,
            extra_endpoints,
        })
    }

    /// Fetch order for one symbol.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = vec![Category::OpenInterest, Category::FundingRate];
        categories.extend(
            self.ratio_categories
                .iter()
                .map(|c| Category::LongShortRatio(*c)),
        );
        categories.push(Category::Liquidation);
        categories
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub symbols_ok: usize,
    pub symbols_failed: usize,
    pub rows_presented: usize,
    pub raw_records: usize,
}

/// Drives fetch, normalize and upsert for every symbol and category.
pub struct Collector<'a, T: HttpTransport> {
    client: &'a mut CoinglassClient<T>,
    store: &'a DataManager,
}

impl<'a, T: HttpTransport> Collector<'a, T> {
    pub fn new(client: &'a mut CoinglassClient<T>, store: &'a DataManager) -> Self {
        Self { client, store }
    }

    /// A failing symbol is logged and skipped; the run carries on.
    pub async fn run(&mut self, plan: &CollectionPlan) -> RunSummary {
        let mut summary = RunSummary::default();

        for symbol in &plan.symbols {
            match self.collect_symbol(plan, symbol).await {
                Ok(rows) => {
                    summary.symbols_ok += 1;
                    summary.rows_presented += rows;
                }
                Err(e) => {
                    summary.symbols_failed += 1;
                    error!("Error fetching data for {}: {:#}", symbol, e);
                }
            }
        }

        for (name, path) in &plan.extra_endpoints {
            match self.collect_snapshot(name, path).await {
                Ok(stored) => summary.raw_records += stored,
                Err(e) => error!("Error fetching {}: {:#}", name, e),
            }
        }

        info!(
            "Run finished: {} symbols ok, {} failed, {} rows presented, {} raw records",
            summary.symbols_ok, summary.symbols_failed, summary.rows_presented, summary.raw_records
        );
        summary
    }

    pub async fn collect_symbol(
        &mut self,
        plan: &CollectionPlan,
        symbol: &str,
    ) -> anyhow::Result<usize> {
        let query = HistoryQuery::new(symbol)
            .interval(plan.interval.clone())
            .range(plan.start_time, plan.end_time);

        let mut rows = 0;
        for category in plan.categories() {
            rows += self
                .collect_category(category, &query, &plan.exchange)
                .await
                .with_context(|| format!("{} for {}", category, symbol))?;
        }
        Ok(rows)
    }

    pub async fn collect_category(
        &mut self,
        category: Category,
        query: &HistoryQuery,
        exchange: &str,
    ) -> anyhow::Result<usize> {
        let request = endpoints::for_category(category, query, exchange);
        let records = self.client.fetch(&request).await?;

        let exchange = matches!(category, Category::LongShortRatio(_)).then_some(exchange);
        let rows = normalize(category, &query.symbol, exchange, records)?;

        Ok(self.store.upsert(&query.symbol, &rows).await?)
    }

    async fn collect_snapshot(&mut self, name: &str, path: &str) -> anyhow::Result<usize> {
        let records = self.client.fetch_generic(path, None).await?;
        let stored = self.store.insert_raw(name, &json!({}), &records).await?;
        Ok(stored)
    }
}
