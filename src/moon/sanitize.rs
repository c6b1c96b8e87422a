//! Best-effort coercion of caller input.
//!
//! The engine never rejects input. Unusable coordinates are replaced by the
//! fallback location and a missing or malformed instant by "now", so the math
//! downstream can assume well-formed values.

use chrono::{DateTime, Utc};

use crate::constants::{FALLBACK_LATITUDE, FALLBACK_LONGITUDE};

/// Observer location that is guaranteed to be in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
}

impl Observer {
    /// The location used whenever the caller's coordinates are unusable.
    pub const FALLBACK: Observer = Observer {
        latitude: FALLBACK_LATITUDE,
        longitude: FALLBACK_LONGITUDE,
    };

    /// Accept the coordinates if both are finite and in range, otherwise use
    /// the fallback location for both.
    pub fn sanitize(latitude: f64, longitude: f64) -> Self {
        if is_valid_latitude(latitude) && is_valid_longitude(longitude) {
            Observer {
                latitude,
                longitude,
            }
        } else {
            log_debug!(
                "Coordinates ({latitude}, {longitude}) unusable, using fallback location ({}, {})",
                FALLBACK_LATITUDE,
                FALLBACK_LONGITUDE
            );
            Self::FALLBACK
        }
    }
}

pub fn is_valid_latitude(latitude: f64) -> bool {
    latitude.is_finite() && (-90.0..=90.0).contains(&latitude)
}

pub fn is_valid_longitude(longitude: f64) -> bool {
    longitude.is_finite() && (-180.0..=180.0).contains(&longitude)
}

/// Use the given instant, or the time source's "now" when there is none.
pub fn resolve_instant(instant: Option<DateTime<Utc>>) -> DateTime<Utc> {
    instant.unwrap_or_else(crate::time_source::now)
}

/// Convert epoch milliseconds to an instant.
///
/// Returns `None` for NaN, infinities and values outside chrono's range.
pub fn instant_from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}
