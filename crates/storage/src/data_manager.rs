use common::models::MetricRows;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::repositories::{
    FundingRateRepository, LiquidationRepository, LongShortRatioRepository,
    OpenInterestRepository, RawDataRepository,
};

/// Owns the single storage handle for a run: opened once, closed once.
pub struct DataManager {
    pool: SqlitePool,
}

impl DataManager {
    /// Opens the file store and ensures the schema, ready for upserts.
    pub async fn open(db_path: &str) -> Result<Self, sqlx::Error> {
        let manager = Self {
            pool: db::open_file_pool(db_path).await?,
        };
        manager.ensure_schema().await?;
        Ok(manager)
    }

    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let manager = Self {
            pool: db::open_memory_pool().await?,
        };
        manager.ensure_schema().await?;
        Ok(manager)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        db::ensure_schema(&self.pool).await
    }

    /// Inserts a normalized batch in one transaction. Rows whose key already
    /// exists are skipped without error. Returns the number of rows presented,
    /// not the number newly written.
    pub async fn upsert(&self, symbol: &str, rows: &MetricRows) -> Result<usize, sqlx::Error> {
        let stored = match rows {
            MetricRows::OpenInterest(points) => {
                OpenInterestRepository::insert_batch(self, points).await?
            }
            MetricRows::FundingRate(points) => {
                FundingRateRepository::insert_batch(self, points).await?
            }
            MetricRows::LongShortRatio(points) => {
                LongShortRatioRepository::insert_batch(self, points).await?
            }
            MetricRows::Liquidation(points) => {
                LiquidationRepository::insert_batch(self, points).await?
            }
        };
        info!("Stored {} {} records for {}", stored, rows.table(), symbol);
        Ok(stored)
    }

    pub async fn insert_raw(
        &self,
        endpoint: &str,
        params: &Value,
        records: &[Value],
    ) -> Result<usize, sqlx::Error> {
        let stored = RawDataRepository::insert_batch(self, endpoint, params, records).await?;
        info!("Stored {} raw records from {}", stored, endpoint);
        Ok(stored)
    }

    pub async fn count(&self, table: &'static str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool).await
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
