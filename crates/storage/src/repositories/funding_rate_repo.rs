use common::models::FundingRatePoint;

use crate::data_manager::DataManager;

pub struct FundingRateRepository;

impl FundingRateRepository {
    pub async fn insert_batch(
        data_manager: &DataManager,
        points: &[FundingRatePoint],
    ) -> Result<usize, sqlx::Error> {
        if points.is_empty() {
            return Ok(0);
        }

        let mut tx = data_manager.pool().begin().await?;

        for point in points {
            sqlx::query(
                r#"
                    INSERT OR IGNORE INTO funding_rate (
                        symbol, time, open, high, low, close
                    ) VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&point.symbol)
            .bind(point.time)
            .bind(point.open)
            .bind(point.high)
            .bind(point.low)
            .bind(point.close)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(points.len())
    }
}
