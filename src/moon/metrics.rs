//! Scalar metrics derived from a primitive sample.
//!
//! Inputs are assumed finite; the engine guarantees that before calling in.

use chrono::{DateTime, Duration, Utc};

use crate::constants::{RADIANCE_BONUS, RADIANCE_MAX};

/// Round to one decimal place.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Illuminated fraction as a whole percentage.
pub fn illumination_percent(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Presentation score: illumination percentage plus a flat bonus, capped at 100.
pub fn radiance_score(fraction: f64) -> f64 {
    let raw = (fraction.clamp(0.0, 1.0) * 100.0 + RADIANCE_BONUS).min(RADIANCE_MAX);
    round_to_tenth(raw).clamp(0.0, RADIANCE_MAX)
}

/// Hours between moonrise and moonset, one decimal.
///
/// A set earlier than the rise means the moon sets on the following day, so
/// a full day is added. `None` when either endpoint is unknown.
pub fn visibility_duration_hours(
    moonrise: Option<DateTime<Utc>>,
    moonset: Option<DateTime<Utc>>,
) -> Option<f64> {
    let (rise, set) = (moonrise?, moonset?);

    let mut window = set - rise;
    if window < Duration::zero() {
        window += Duration::hours(24);
    }

    let hours = window.num_milliseconds() as f64 / 3_600_000.0;
    Some(round_to_tenth(hours.max(0.0)))
}

/// Altitude in degrees; non-finite input reads as the horizon.
pub fn altitude_degrees(altitude_radians: f64) -> f64 {
    if altitude_radians.is_finite() {
        altitude_radians.to_degrees()
    } else {
        0.0
    }
}

/// Distance rounded to whole kilometres, never negative.
pub fn distance_km(distance: f64) -> u32 {
    distance.max(0.0).round().min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 12, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_visibility_same_day() {
        let hours = visibility_duration_hours(Some(at(8, 0)), Some(at(19, 30)));
        assert_eq!(hours, Some(11.5));
    }

    #[test]
    fn test_visibility_wraps_past_midnight() {
        // Rises in the evening, sets the next morning.
        let hours = visibility_duration_hours(Some(at(20, 0)), Some(at(6, 15)));
        assert_eq!(hours, Some(10.3));
    }

    #[test]
    fn test_visibility_requires_both_endpoints() {
        assert_eq!(visibility_duration_hours(None, Some(at(6, 0))), None);
        assert_eq!(visibility_duration_hours(Some(at(6, 0)), None), None);
        assert_eq!(visibility_duration_hours(None, None), None);
    }

    #[test]
    fn test_radiance_bonus_and_cap() {
        assert_eq!(radiance_score(0.0), 5.0);
        assert_eq!(radiance_score(0.5), 55.0);
        assert_eq!(radiance_score(0.9), 95.0);
        assert_eq!(radiance_score(0.97), 100.0);
        assert_eq!(radiance_score(1.0), 100.0);
        assert_eq!(radiance_score(0.1234), 17.3);
    }

    #[test]
    fn test_illumination_percent_rounds() {
        assert_eq!(illumination_percent(0.0), 0);
        assert_eq!(illumination_percent(0.004), 0);
        assert_eq!(illumination_percent(0.005), 1);
        assert_eq!(illumination_percent(0.915), 92);
        assert_eq!(illumination_percent(1.0), 100);
    }

    #[test]
    fn test_altitude_conversion() {
        assert!((altitude_degrees(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-9);
        assert!((altitude_degrees(-0.1) + 5.729_577_951).abs() < 1e-6);
        assert_eq!(altitude_degrees(f64::NAN), 0.0);
        assert_eq!(altitude_degrees(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_distance_never_negative() {
        assert_eq!(distance_km(384_400.4), 384_400);
        assert_eq!(distance_km(-12.0), 0);
    }
}
