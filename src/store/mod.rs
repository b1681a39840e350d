//! Store access: startup connection polling plus the source and sink
//! collaborators.
//!
//! Connection establishment is the only place `StoreUnavailable` is
//! recovered; once a pool exists, any later store failure is fatal for the
//! run.

pub mod sink;
pub mod source;

pub use sink::SummarySink;
pub use source::SourceStore;

use crate::error::EtlError;
use sqlx::{MySqlPool, PgPool};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Block until the PostgreSQL source store accepts a connection.
pub async fn connect_source(url: &str) -> PgPool {
    loop {
        match PgPool::connect(url).await {
            Ok(pool) => return pool,
            Err(e) => {
                let err = EtlError::StoreUnavailable(e);
                debug!("Source store not ready, retrying: {}", err);
                sleep(RETRY_BACKOFF).await;
            }
        }
    }
}

/// Block until the MySQL destination store accepts a connection.
pub async fn connect_sink(url: &str) -> MySqlPool {
    loop {
        match MySqlPool::connect(url).await {
            Ok(pool) => return pool,
            Err(e) => {
                let err = EtlError::StoreUnavailable(e);
                debug!("Destination store not ready, retrying: {}", err);
                sleep(RETRY_BACKOFF).await;
            }
        }
    }
}
