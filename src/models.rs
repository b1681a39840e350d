//! Data models for the rollup pipeline.
//!
//! `Reading` mirrors the source row exactly (string-encoded timestamp and
//! location included); parsing into usable values is deferred to the
//! accessor methods so a malformed row surfaces as a typed error instead of
//! a decode failure inside the database driver.

use crate::error::EtlError;
use serde::Deserialize;
use sqlx::FromRow;

/// One raw telemetry sample as stored in the source `devices` table.
#[derive(Debug, Clone, FromRow)]
pub struct Reading {
    /// Opaque device identifier.
    pub device_id: String,
    /// Epoch seconds, string-encoded in the source store.
    #[sqlx(rename = "time")]
    pub timestamp: String,
    /// JSON payload with `latitude`/`longitude` in degrees.
    pub location: String,
    /// Temperature in whole degrees.
    pub temperature: i32,
}

impl Reading {
    /// Parse the string-encoded timestamp as epoch seconds.
    pub fn epoch_seconds(&self) -> Result<i64, EtlError> {
        self.timestamp
            .trim()
            .parse::<i64>()
            .map_err(|e| EtlError::MalformedReading {
                device_id: self.device_id.clone(),
                reason: format!("non-numeric timestamp {:?}: {}", self.timestamp, e),
            })
    }

    /// Decode the location payload.
    ///
    /// Both `latitude` and `longitude` must be present; extra keys are
    /// ignored.
    pub fn coordinates(&self) -> Result<Coordinates, EtlError> {
        serde_json::from_str(&self.location).map_err(|e| EtlError::MalformedReading {
            device_id: self.device_id.clone(),
            reason: format!("invalid location payload {:?}: {}", self.location, e),
        })
    }
}

/// A decoded geo-location in floating-point degrees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The grouping key for aggregation: one bucket per device per hour-of-day.
///
/// `hour` is a 24-valued cyclical bucket (0-23), not a timestamped hour of
/// history: readings from different calendar days that share a wall-clock
/// hour merge into the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub device_id: String,
    pub hour: u32,
}

/// One aggregated row per group, as persisted to the destination store.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub device_id: String,
    /// Hour-of-day bucket, 0-23.
    pub hour: u32,
    /// Maximum temperature observed in the group.
    pub max_temperature: i32,
    /// Cumulative geodesic travel distance in statute miles.
    pub total_distance: f64,
    /// Number of readings folded into the group.
    pub data_point_count: i64,
}
