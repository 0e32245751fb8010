//! Timestamp conversion for time fields
//!
//! Times are stored as floating-point seconds since the Unix epoch.

use std::time::{SystemTime, UNIX_EPOCH};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Convert a timestamp to fractional seconds since the Unix epoch
///
/// Times before the epoch produce negative values. The conversion goes
/// through whole nanoseconds so sub-second precision matches what an
/// integer nanosecond clock would report.
pub fn time_to_seconds(t: SystemTime) -> f64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_nanos() as f64 / NANOS_PER_SEC,
        Err(e) => -(e.duration().as_nanos() as f64) / NANOS_PER_SEC,
    }
}
