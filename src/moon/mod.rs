//! Lunar metrics engine.
//!
//! Turns raw astronomical primitives into the values smoon displays: phase
//! name, illumination, rise/set, days to the next full moon, visibility window
//! and the radiance score.
//!
//! ## Module Structure
//!
//! - [`primitive`]: The celestial primitive interface and guarded sampling
//! - [`ephemeris`]: Built-in low-precision lunar ephemeris
//! - [`phase`]: Phase classification and cycle arithmetic
//! - [`metrics`]: Scalar metrics (visibility window, radiance, unit conversion)
//! - [`sanitize`]: Best-effort coercion of caller input
//! - [`display`]: Formatting and logging of computed states
//!
//! ## Failure policy
//!
//! [`MoonEngine::compute`] is total. Bad input is coerced at the boundary,
//! each primitive call degrades to documented defaults on its own, and an
//! unusable illumination sample yields [`MoonState::fallback`].

pub mod display;
pub mod ephemeris;
pub mod metrics;
pub mod phase;
pub mod primitive;
pub mod sanitize;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DISTANCE_KM, FALLBACK_DAYS_UNTIL_FULL_MOON};
pub use ephemeris::Ephemeris;
pub use phase::PhaseName;
pub use primitive::{CelestialPrimitive, Illumination, Position, RiseSet};
pub use sanitize::Observer;

use primitive::{Sample, sample_illumination, sample_position, sample_rise_set};

/// Computed lunar state for one location and instant.
///
/// Recomputed on every evaluation; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonState {
    pub phase_name: PhaseName,
    /// Position in the cycle, 0/1 new moon, 0.5 full moon.
    pub phase_value: f64,
    pub illumination_percent: u8,
    pub moonrise: Option<DateTime<Utc>>,
    pub moonset: Option<DateTime<Utc>>,
    pub days_until_full_moon: u32,
    /// Present only when both moonrise and moonset are.
    pub visibility_duration_hours: Option<f64>,
    pub distance_km: u32,
    pub radiance_score: f64,
    /// Negative when the moon is below the horizon.
    pub altitude_degrees: f64,
}

impl MoonState {
    /// State reported when no usable illumination sample exists.
    pub fn fallback() -> Self {
        Self {
            phase_name: PhaseName::NewMoon,
            phase_value: 0.0,
            illumination_percent: 0,
            moonrise: None,
            moonset: None,
            days_until_full_moon: FALLBACK_DAYS_UNTIL_FULL_MOON,
            visibility_duration_hours: None,
            distance_km: metrics::distance_km(DEFAULT_DISTANCE_KM),
            radiance_score: metrics::radiance_score(0.0),
            altitude_degrees: 0.0,
        }
    }

    fn from_samples(illumination: Illumination, times: RiseSet, position: Position) -> Self {
        let phase_value = illumination.phase.clamp(0.0, 1.0);

        Self {
            phase_name: phase::classify_phase(phase_value),
            phase_value,
            illumination_percent: metrics::illumination_percent(illumination.fraction),
            moonrise: times.rise,
            moonset: times.set,
            days_until_full_moon: phase::days_until_full_moon(phase_value),
            visibility_duration_hours: metrics::visibility_duration_hours(times.rise, times.set),
            distance_km: metrics::distance_km(position.distance_km),
            radiance_score: metrics::radiance_score(illumination.fraction),
            altitude_degrees: metrics::altitude_degrees(position.altitude_radians),
        }
    }

    /// Whether the moon is above the horizon.
    pub fn is_visible(&self) -> bool {
        self.altitude_degrees > 0.0
    }

    /// Frame of the 30-frame moon sprite sheet.
    pub fn sprite_index(&self) -> u8 {
        phase::sprite_index(self.phase_value)
    }
}

/// Metrics engine over an injected celestial primitive.
#[derive(Debug, Clone, Default)]
pub struct MoonEngine<P> {
    primitive: P,
}

impl<P: CelestialPrimitive> MoonEngine<P> {
    pub fn new(primitive: P) -> Self {
        Self { primitive }
    }

    /// Compute the lunar state for a location and instant.
    ///
    /// Never fails. Out-of-range or non-finite coordinates are replaced by
    /// the fallback location and a missing instant by "now".
    pub fn compute(
        &self,
        latitude: f64,
        longitude: f64,
        instant: Option<DateTime<Utc>>,
    ) -> MoonState {
        let observer = Observer::sanitize(latitude, longitude);
        let instant = sanitize::resolve_instant(instant);
        self.compute_for(observer, instant)
    }

    /// Compute for an already sanitized observer.
    pub fn compute_for(&self, observer: Observer, instant: DateTime<Utc>) -> MoonState {
        let illumination = match sample_illumination(&self.primitive, instant) {
            Sample::Measured(illumination) => illumination,
            Sample::Degraded(_) => {
                log_debug!("Illumination unavailable, reporting fallback moon state");
                return MoonState::fallback();
            }
        };

        let times = sample_rise_set(
            &self.primitive,
            instant,
            observer.latitude,
            observer.longitude,
        );
        let position = sample_position(
            &self.primitive,
            instant,
            observer.latitude,
            observer.longitude,
        );

        if times.is_degraded() || position.is_degraded() {
            log_debug!(
                "Partial moon state at {instant}: rise/set {}, position {}",
                if times.is_degraded() { "defaulted" } else { "ok" },
                if position.is_degraded() { "defaulted" } else { "ok" }
            );
        }

        MoonState::from_samples(illumination, times.into_value(), position.into_value())
    }
}

/// Compute the lunar state with the built-in ephemeris (rise/set days in UTC).
pub fn compute_moon_state(
    latitude: f64,
    longitude: f64,
    instant: Option<DateTime<Utc>>,
) -> MoonState {
    MoonEngine::new(Ephemeris::default()).compute(latitude, longitude, instant)
}
