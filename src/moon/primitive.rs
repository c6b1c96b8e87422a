//! Interface to the celestial primitive the engine consumes.
//!
//! The engine treats the primitive as a pure function of instant and
//! location. Each of the three queries may fail independently; the engine
//! wraps every answer in a [`Sample`] so the degradation policy is explicit.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_DISTANCE_KM;

/// Illuminated fraction and phase for an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illumination {
    /// Lit portion of the visible disk, 0 (new) to 1 (full).
    pub fraction: f64,
    /// Position in the synodic cycle: 0/1 new moon, 0.5 full moon.
    pub phase: f64,
}

/// Rise and set instants for the day containing the queried instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiseSet {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
}

/// Topocentric position of the moon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub altitude_radians: f64,
    pub distance_km: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            altitude_radians: 0.0,
            distance_km: DEFAULT_DISTANCE_KM,
        }
    }
}

/// Source of raw lunar data.
#[cfg_attr(test, mockall::automock)]
pub trait CelestialPrimitive {
    fn illumination(&self, instant: DateTime<Utc>) -> Result<Illumination>;

    fn rise_set(&self, instant: DateTime<Utc>, latitude: f64, longitude: f64) -> Result<RiseSet>;

    fn position(&self, instant: DateTime<Utc>, latitude: f64, longitude: f64) -> Result<Position>;
}

/// Outcome of one guarded primitive call.
///
/// `Degraded` still carries a usable value: the documented default for
/// whatever part of the answer could not be trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Sample<T> {
    Measured(T),
    Degraded(T),
}

impl<T> Sample<T> {
    pub(crate) fn is_degraded(&self) -> bool {
        matches!(self, Sample::Degraded(_))
    }

    pub(crate) fn into_value(self) -> T {
        match self {
            Sample::Measured(value) | Sample::Degraded(value) => value,
        }
    }
}

/// Query illumination. Any error or non-finite field makes the whole sample
/// unusable, since phase name, days to full and radiance all hang off it.
pub(crate) fn sample_illumination<P: CelestialPrimitive + ?Sized>(
    primitive: &P,
    instant: DateTime<Utc>,
) -> Sample<Illumination> {
    let unusable = Illumination {
        fraction: 0.0,
        phase: 0.0,
    };

    match primitive.illumination(instant) {
        Ok(raw) if raw.fraction.is_finite() && raw.phase.is_finite() => Sample::Measured(Illumination {
            fraction: raw.fraction.clamp(0.0, 1.0),
            phase: raw.phase.clamp(0.0, 1.0),
        }),
        Ok(raw) => {
            log_debug!(
                "Illumination returned non-finite values (fraction={}, phase={})",
                raw.fraction,
                raw.phase
            );
            Sample::Degraded(unusable)
        }
        Err(e) => {
            log_debug!("Illumination query failed: {e:#}");
            Sample::Degraded(unusable)
        }
    }
}

/// Query rise/set. Failure means neither endpoint is known.
pub(crate) fn sample_rise_set<P: CelestialPrimitive + ?Sized>(
    primitive: &P,
    instant: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
) -> Sample<RiseSet> {
    match primitive.rise_set(instant, latitude, longitude) {
        Ok(times) => Sample::Measured(times),
        Err(e) => {
            log_debug!("Rise/set query failed: {e:#}");
            Sample::Degraded(RiseSet::default())
        }
    }
}

/// Query position. Altitude and distance degrade independently.
pub(crate) fn sample_position<P: CelestialPrimitive + ?Sized>(
    primitive: &P,
    instant: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
) -> Sample<Position> {
    let fallback = Position::default();

    match primitive.position(instant, latitude, longitude) {
        Ok(raw) => {
            let altitude_ok = raw.altitude_radians.is_finite();
            let distance_ok = raw.distance_km.is_finite();
            let position = Position {
                altitude_radians: if altitude_ok {
                    raw.altitude_radians
                } else {
                    fallback.altitude_radians
                },
                distance_km: if distance_ok {
                    raw.distance_km
                } else {
                    fallback.distance_km
                },
            };

            if altitude_ok && distance_ok {
                Sample::Measured(position)
            } else {
                log_debug!(
                    "Position returned non-finite values (altitude={}, distance={})",
                    raw.altitude_radians,
                    raw.distance_km
                );
                Sample::Degraded(position)
            }
        }
        Err(e) => {
            log_debug!("Position query failed: {e:#}");
            Sample::Degraded(fallback)
        }
    }
}
