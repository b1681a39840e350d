//! Error types for the rollup pipeline.

use thiserror::Error;

/// Unified error type for a pipeline run.
///
/// `SchemaAlreadyExists` from the destination store has no variant here:
/// schema creation uses `CREATE TABLE IF NOT EXISTS`, so an existing table
/// is indistinguishable from a fresh one.
#[derive(Error, Debug)]
pub enum EtlError {
    /// A backing store refused the connection. Recovered by the startup
    /// polling loop only; never retried mid-pass.
    #[error("store unavailable: {0}")]
    StoreUnavailable(sqlx::Error),

    /// A reading failed to parse. Fatal: one bad reading aborts the whole
    /// batch before anything is written.
    #[error("malformed reading for device {device_id}: {reason}")]
    MalformedReading { device_id: String, reason: String },

    /// The destination batch could not be committed. Fatal, not retried.
    #[error("summary commit failed: {0}")]
    CommitFailure(sqlx::Error),
}
