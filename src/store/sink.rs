//! Writer side: schema creation and transactional batch persist into the
//! MySQL destination store.

use crate::error::EtlError;
use crate::models::{GroupKey, Summary};
use anyhow::{Context, Result};
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::debug;

/// One destination row, shaped exactly as the `analytics_data` columns.
///
/// All numeric fields keep the width of their column (`DOUBLE` for the
/// distance), so converting a `Summary` to a row and back is lossless.
#[derive(Debug, Clone, PartialEq)]
struct SummaryRow {
    device_id: String,
    hour: u32,
    max_temperature: i32,
    total_distance: f64,
    data_point_count: i64,
}

impl From<&Summary> for SummaryRow {
    fn from(summary: &Summary) -> Self {
        Self {
            device_id: summary.device_id.clone(),
            hour: summary.hour,
            max_temperature: summary.max_temperature,
            total_distance: summary.total_distance,
            data_point_count: summary.data_point_count,
        }
    }
}

impl SummaryRow {
    fn into_summary(self) -> Summary {
        Summary {
            device_id: self.device_id,
            hour: self.hour,
            max_temperature: self.max_temperature,
            total_distance: self.total_distance,
            data_point_count: self.data_point_count,
        }
    }
}

/// Write handle over the destination `analytics_data` table.
pub struct SummarySink {
    pool: MySqlPool,
}

impl SummarySink {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the destination table if it does not exist yet.
    ///
    /// Safe to call on every run; an existing table is success. The table
    /// has an auto-increment surrogate key and no unique constraint on
    /// (device_id, hour): repeated runs append rather than upsert.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics_data (
                id               INT AUTO_INCREMENT PRIMARY KEY,
                device_id        VARCHAR(50) NOT NULL,
                hour             INT         NOT NULL,
                max_temperature  INT         NOT NULL,
                total_distance   DOUBLE      NOT NULL,
                data_point_count INT         NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create the analytics_data table")?;

        Ok(())
    }

    /// Persist one row per summary inside a single transaction.
    ///
    /// Returns the number of rows written. If the commit fails nothing
    /// becomes visible (InnoDB transactional batch).
    pub async fn persist(
        &self,
        summaries: &HashMap<GroupKey, Summary>,
    ) -> Result<u64, EtlError> {
        let mut tx = self.pool.begin().await.map_err(EtlError::CommitFailure)?;

        for summary in summaries.values() {
            let row = SummaryRow::from(summary);
            sqlx::query(
                "INSERT INTO analytics_data \
                 (device_id, hour, max_temperature, total_distance, data_point_count) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&row.device_id)
            .bind(row.hour)
            .bind(row.max_temperature)
            .bind(row.total_distance)
            .bind(row.data_point_count)
            .execute(&mut *tx)
            .await
            .map_err(EtlError::CommitFailure)?;
        }

        tx.commit().await.map_err(EtlError::CommitFailure)?;

        debug!("Committed {} summary rows", summaries.len());
        Ok(summaries.len() as u64)
    }

    /// Release the underlying connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
