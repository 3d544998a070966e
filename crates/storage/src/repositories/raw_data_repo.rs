use chrono::Utc;
use serde_json::Value;

use crate::data_manager::DataManager;

/// Append-only log of untyped endpoint snapshots, one row per record.
pub struct RawDataRepository;

impl RawDataRepository {
    pub async fn insert_batch(
        data_manager: &DataManager,
        endpoint: &str,
        params: &Value,
        records: &[Value],
    ) -> Result<usize, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }
        let retrieved_at = Utc::now().timestamp();
        let params = params.to_string();

        let mut tx = data_manager.pool().begin().await?;

        for record in records {
            sqlx::query(
                r#"
                    INSERT INTO raw_api_data (endpoint, params, retrieved_at, data)
                    VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(endpoint)
            .bind(&params)
            .bind(retrieved_at)
            .bind(record.to_string())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(records.len())
    }
}
