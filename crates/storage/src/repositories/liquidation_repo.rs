use common::models::LiquidationPoint;

use crate::data_manager::DataManager;

pub struct LiquidationRepository;

impl LiquidationRepository {
    pub async fn insert_batch(
        data_manager: &DataManager,
        points: &[LiquidationPoint],
    ) -> Result<usize, sqlx::Error> {
        if points.is_empty() {
            return Ok(0);
        }
        let mut tx = data_manager.pool().begin().await?;

        for point in points {
            sqlx::query(
                r#"
                    INSERT OR IGNORE INTO liquidations (
                        symbol, time, long_liquidation_usd, short_liquidation_usd
                    ) VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&point.symbol)
            .bind(point.time)
            .bind(point.long_liquidation_usd)
            .bind(point.short_liquidation_usd)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(points.len())
    }
}
