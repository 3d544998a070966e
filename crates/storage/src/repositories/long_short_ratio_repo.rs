use common::models::LongShortRatioPoint;

use crate::data_manager::DataManager;

pub struct LongShortRatioRepository;

impl LongShortRatioRepository {
    pub async fn insert_batch(
        data_manager: &DataManager,
        points: &[LongShortRatioPoint],
    ) -> Result<usize, sqlx::Error> {
        if points.is_empty() {
            return Ok(0);
        }

        let mut tx = data_manager.pool().begin().await?;

        for point in points {
            sqlx::query(
                r#"
                    INSERT OR IGNORE INTO long_short_ratio (
                        symbol, exchange, time, long_percent, short_percent,
                        long_short_ratio, category
                    ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&point.symbol)
            .bind(&point.exchange)
            .bind(point.time)
            .bind(point.long_percent)
            .bind(point.short_percent)
            .bind(point.long_short_ratio)
            .bind(point.category.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(points.len())
    }
}
