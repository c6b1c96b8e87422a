//! Built-in low-precision lunar ephemeris.
//!
//! Mean-element formulas for the sun and moon, good to a fraction of a degree
//! and a few minutes of rise/set time, which is all a display needs. Angles
//! are radians throughout; time is expressed in days since J2000.0.

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};
use std::f64::consts::PI;

use super::primitive::{CelestialPrimitive, Illumination, Position, RiseSet};
use super::sanitize::{is_valid_latitude, is_valid_longitude};

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;

/// Obliquity of the ecliptic.
const OBLIQUITY: f64 = 23.4397 * RAD;
const SUN_DISTANCE_KM: f64 = 149_598_000.0;

/// Apparent radius plus parallax correction applied to the horizon for rise/set.
const HORIZON_CORRECTION: f64 = 0.133 * RAD;

#[derive(Debug, Clone, Copy)]
struct Equatorial {
    right_ascension: f64,
    declination: f64,
    distance_km: f64,
}

/// Days since J2000.0 for an instant.
fn days_since_j2000(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / DAY_MS - 0.5 + J1970 - J2000
}

fn right_ascension(longitude: f64, latitude: f64) -> f64 {
    (longitude.sin() * OBLIQUITY.cos() - latitude.tan() * OBLIQUITY.sin()).atan2(longitude.cos())
}

fn declination(longitude: f64, latitude: f64) -> f64 {
    (latitude.sin() * OBLIQUITY.cos() + latitude.cos() * OBLIQUITY.sin() * longitude.sin()).asin()
}

fn altitude(hour_angle: f64, phi: f64, declination: f64) -> f64 {
    (phi.sin() * declination.sin() + phi.cos() * declination.cos() * hour_angle.cos()).asin()
}

fn sidereal_time(days: f64, west_longitude: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * days) - west_longitude
}

/// Refraction lift near the horizon; negative altitudes are treated as zero.
fn astro_refraction(altitude: f64) -> f64 {
    let h = altitude.max(0.0);
    0.000_296_7 / (h + 0.003_125_36 / (h + 0.089_011_79)).tan()
}

fn sun_coords(days: f64) -> Equatorial {
    let mean_anomaly = RAD * (357.5291 + 0.985_600_28 * days);
    let center = RAD
        * (1.9148 * mean_anomaly.sin()
            + 0.02 * (2.0 * mean_anomaly).sin()
            + 0.0003 * (3.0 * mean_anomaly).sin());
    let perihelion = RAD * 102.9372;
    let ecliptic_longitude = mean_anomaly + center + perihelion + PI;

    Equatorial {
        right_ascension: right_ascension(ecliptic_longitude, 0.0),
        declination: declination(ecliptic_longitude, 0.0),
        distance_km: SUN_DISTANCE_KM,
    }
}

fn moon_coords(days: f64) -> Equatorial {
    let mean_longitude = RAD * (218.316 + 13.176_396 * days);
    let mean_anomaly = RAD * (134.963 + 13.064_993 * days);
    let mean_distance = RAD * (93.272 + 13.229_350 * days);

    let longitude = mean_longitude + RAD * 6.289 * mean_anomaly.sin();
    let latitude = RAD * 5.128 * mean_distance.sin();

    Equatorial {
        right_ascension: right_ascension(longitude, latitude),
        declination: declination(longitude, latitude),
        distance_km: 385_001.0 - 20_905.0 * mean_anomaly.cos(),
    }
}

/// Refracted altitude and distance of the moon for an observer.
fn moon_position(days: f64, latitude: f64, longitude: f64) -> (f64, f64) {
    let west_longitude = RAD * -longitude;
    let phi = RAD * latitude;
    let moon = moon_coords(days);

    let hour_angle = sidereal_time(days, west_longitude) - moon.right_ascension;
    let h = altitude(hour_angle, phi, moon.declination);

    (h + astro_refraction(h), moon.distance_km)
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !is_valid_latitude(latitude) {
        bail!("latitude must be between -90 and 90 degrees (got {latitude})");
    }
    if !is_valid_longitude(longitude) {
        bail!("longitude must be between -180 and 180 degrees (got {longitude})");
    }
    Ok(())
}

/// Lunar ephemeris with a configurable day boundary for rise/set searches.
#[derive(Debug, Clone, Copy)]
pub struct Ephemeris {
    day_offset: FixedOffset,
}

impl Default for Ephemeris {
    fn default() -> Self {
        Self {
            day_offset: Utc.fix(),
        }
    }
}

impl Ephemeris {
    /// Rise/set days start at midnight in the given offset instead of UTC.
    pub fn with_day_offset(day_offset: FixedOffset) -> Self {
        Self { day_offset }
    }

    /// Midnight at the start of the day containing `instant`.
    fn day_start(&self, instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let local_date = instant.with_timezone(&self.day_offset).date_naive();
        let Some(midnight) = local_date.and_hms_opt(0, 0, 0) else {
            bail!("Could not build midnight for {local_date}");
        };
        match self.day_offset.from_local_datetime(&midnight).single() {
            Some(start) => Ok(start.with_timezone(&Utc)),
            None => bail!("Ambiguous midnight for {local_date}"),
        }
    }
}

impl CelestialPrimitive for Ephemeris {
    fn illumination(&self, instant: DateTime<Utc>) -> Result<Illumination> {
        let days = days_since_j2000(instant);
        let sun = sun_coords(days);
        let moon = moon_coords(days);

        let delta_ra = sun.right_ascension - moon.right_ascension;
        let elongation = (sun.declination.sin() * moon.declination.sin()
            + sun.declination.cos() * moon.declination.cos() * delta_ra.cos())
        .clamp(-1.0, 1.0)
        .acos();
        let inclination = (sun.distance_km * elongation.sin())
            .atan2(moon.distance_km - sun.distance_km * elongation.cos());
        let angle = (sun.declination.cos() * delta_ra.sin()).atan2(
            sun.declination.sin() * moon.declination.cos()
                - sun.declination.cos() * moon.declination.sin() * delta_ra.cos(),
        );

        let sign = if angle < 0.0 { -1.0 } else { 1.0 };
        Ok(Illumination {
            fraction: (1.0 + inclination.cos()) / 2.0,
            phase: 0.5 + 0.5 * inclination * sign / PI,
        })
    }

    /// Horizon crossings within the day, found by fitting a parabola through
    /// altitude samples taken every hour and solving for its roots.
    fn rise_set(&self, instant: DateTime<Utc>, latitude: f64, longitude: f64) -> Result<RiseSet> {
        check_coordinates(latitude, longitude)?;

        let start = self.day_start(instant)?;
        let start_days = days_since_j2000(start);
        let altitude_at = |hours: f64| {
            moon_position(start_days + hours / 24.0, latitude, longitude).0 - HORIZON_CORRECTION
        };

        let mut rise: Option<f64> = None;
        let mut set: Option<f64> = None;
        let mut h0 = altitude_at(0.0);
        let mut hour = 1.0;

        while hour <= 24.0 {
            let h1 = altitude_at(hour);
            let h2 = altitude_at(hour + 1.0);

            let a = (h0 + h2) / 2.0 - h1;
            let b = (h2 - h0) / 2.0;
            let xe = -b / (2.0 * a);
            let ye = (a * xe + b) * xe + h1;
            let discriminant = b * b - 4.0 * a * h1;

            let mut roots = 0;
            let mut x1 = 0.0;
            let mut x2 = 0.0;
            if discriminant >= 0.0 {
                let dx = discriminant.sqrt() / (a.abs() * 2.0);
                x1 = xe - dx;
                x2 = xe + dx;
                if x1.abs() <= 1.0 {
                    roots += 1;
                }
                if x2.abs() <= 1.0 {
                    roots += 1;
                }
                if x1 < -1.0 {
                    x1 = x2;
                }
            }

            match roots {
                1 if h0 < 0.0 => rise = Some(hour + x1),
                1 => set = Some(hour + x1),
                2 => {
                    rise = Some(hour + if ye < 0.0 { x2 } else { x1 });
                    set = Some(hour + if ye < 0.0 { x1 } else { x2 });
                }
                _ => {}
            }

            if rise.is_some() && set.is_some() {
                break;
            }
            h0 = h2;
            hour += 2.0;
        }

        let to_instant =
            |hours: f64| start + Duration::milliseconds((hours * 3_600_000.0).round() as i64);

        Ok(RiseSet {
            rise: rise.map(to_instant),
            set: set.map(to_instant),
        })
    }

    fn position(&self, instant: DateTime<Utc>, latitude: f64, longitude: f64) -> Result<Position> {
        check_coordinates(latitude, longitude)?;

        let (altitude_radians, distance_km) =
            moon_position(days_since_j2000(instant), latitude, longitude);

        Ok(Position {
            altitude_radians,
            distance_km,
        })
    }
}
