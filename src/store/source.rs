//! Reader side: full-batch fetch of raw readings from the PostgreSQL
//! source store.

use crate::models::Reading;
use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::debug;

/// Read handle over the source `devices` table.
pub struct SourceStore {
    pool: PgPool,
}

impl SourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every reading in the source store, in whatever order the store
    /// returns them. No filtering, windowing, or pagination.
    pub async fn fetch_readings(&self) -> Result<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            "SELECT device_id, time, location, temperature FROM devices",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch readings from the source store")?;

        debug!("Fetched {} readings", readings.len());
        Ok(readings)
    }

    /// Release the underlying connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
