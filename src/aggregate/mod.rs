//! Per-device, per-hour aggregation of raw readings.
//!
//! This is the core of the pipeline: a pure, synchronous fold that groups a
//! batch of readings by (device, hour-of-day) and reduces each group to its
//! maximum temperature, cumulative travel distance, and sample count. It
//! performs no I/O and is deterministic for a fixed input order.

use crate::error::EtlError;
use crate::models::{Coordinates, GroupKey, Reading, Summary};
use chrono::{Local, TimeZone, Timelike};
use geo::{point, GeodesicDistance};
use std::collections::HashMap;

const METERS_PER_MILE: f64 = 1_609.344;

/// Running state for one (device, hour) group while the batch is folded.
struct Accumulator {
    max_temperature: i32,
    total_distance: f64,
    data_point_count: i64,
    previous_location: Option<Coordinates>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            max_temperature: i32::MIN,
            total_distance: 0.0,
            data_point_count: 0,
            previous_location: None,
        }
    }

    fn into_summary(self, key: &GroupKey) -> Summary {
        Summary {
            device_id: key.device_id.clone(),
            hour: key.hour,
            max_temperature: self.max_temperature,
            total_distance: self.total_distance,
            data_point_count: self.data_point_count,
        }
    }
}

/// Fold a batch of readings into one summary per (device, hour-of-day) group.
///
/// Readings are consumed in the order given. A group's `total_distance` is
/// the sum of geodesic distances between consecutive readings of that group
/// in this traversal order, with the first reading contributing zero, so
/// the result is order-sensitive within a group. The source store gives no
/// ordering guarantee; its delivery order is treated as the traversal order.
///
/// One reading that fails to parse aborts the whole batch with
/// [`EtlError::MalformedReading`]; no partial result is returned.
pub fn aggregate(readings: &[Reading]) -> Result<HashMap<GroupKey, Summary>, EtlError> {
    let mut groups: HashMap<GroupKey, Accumulator> = HashMap::new();

    for reading in readings {
        let epoch = reading.epoch_seconds()?;
        let hour = hour_of_day(epoch).ok_or_else(|| EtlError::MalformedReading {
            device_id: reading.device_id.clone(),
            reason: format!("timestamp {} outside the representable range", epoch),
        })?;
        let location = reading.coordinates()?;

        let key = GroupKey {
            device_id: reading.device_id.clone(),
            hour,
        };
        let acc = groups.entry(key).or_insert_with(Accumulator::new);

        if let Some(previous) = &acc.previous_location {
            acc.total_distance += distance_miles(previous, &location);
        }
        acc.max_temperature = acc.max_temperature.max(reading.temperature);
        acc.data_point_count += 1;
        acc.previous_location = Some(location);
    }

    Ok(groups
        .into_iter()
        .map(|(key, acc)| {
            let summary = acc.into_summary(&key);
            (key, summary)
        })
        .collect())
}

/// Local wall-clock hour-of-day (0-23) for an epoch-seconds timestamp.
///
/// Returns `None` only for timestamps chrono cannot represent.
fn hour_of_day(epoch_seconds: i64) -> Option<u32> {
    Local
        .timestamp_opt(epoch_seconds, 0)
        .single()
        .map(|dt| dt.hour())
}

/// Geodesic distance between two points in statute miles, computed with the
/// Karney algorithm on the WGS-84 ellipsoid.
fn distance_miles(from: &Coordinates, to: &Coordinates) -> f64 {
    let a = point!(x: from.longitude, y: from.latitude);
    let b = point!(x: to.longitude, y: to.latitude);
    a.geodesic_distance(&b) / METERS_PER_MILE
}
