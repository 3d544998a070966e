use common::models::OpenInterestPoint;

use crate::data_manager::DataManager;

pub struct OpenInterestRepository;

impl OpenInterestRepository {
    pub async fn insert_batch(
        data_manager: &DataManager,
        points: &[OpenInterestPoint],
    ) -> Result<usize, sqlx::Error> {
        if points.is_empty() {
            return Ok(0);
        }

        let mut tx = data_manager.pool().begin().await?;

        for point in points {
            sqlx::query(
                r#"
                    INSERT OR IGNORE INTO open_interest (
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
