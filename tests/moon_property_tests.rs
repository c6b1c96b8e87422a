use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use smoon::moon::phase::{classify_phase, days_until_full_moon, sprite_index};
use smoon::moon::{CelestialPrimitive, Ephemeris, PhaseName};
use smoon::{MoonState, compute_moon_state};

fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Instants between 1990 and 2070.
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (631_152_000i64..3_155_760_000i64).prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap())
}

#[test]
fn test_band_lower_edges_belong_to_their_band() {
    let edges = [
        (0.0, PhaseName::NewMoon),
        (0.03, PhaseName::WaxingCrescent),
        (0.22, PhaseName::FirstQuarter),
        (0.28, PhaseName::WaxingGibbous),
        (0.47, PhaseName::FullMoon),
        (0.53, PhaseName::WaningGibbous),
        (0.72, PhaseName::LastQuarter),
        (0.78, PhaseName::WaningCrescent),
        (0.97, PhaseName::WaningCrescent),
        (0.9701, PhaseName::NewMoon),
        (1.0, PhaseName::NewMoon),
    ];
    for (phase, expected) in edges {
        assert_eq!(classify_phase(phase), expected, "phase {phase}");
    }
}

#[test]
fn test_known_lunations() {
    // Full moon 2024-01-25 17:54 UTC, new moon 2024-01-11 11:57 UTC.
    let full = compute_moon_state(0.0, 0.0, Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).single());
    assert_eq!(full.phase_name, PhaseName::FullMoon);
    assert!(full.illumination_percent >= 99);
    assert!(full.days_until_full_moon <= 1 || full.days_until_full_moon >= 29);

    let new = compute_moon_state(0.0, 0.0, Utc.with_ymd_and_hms(2024, 1, 11, 11, 57, 0).single());
    assert_eq!(new.phase_name, PhaseName::NewMoon);
    assert!(new.illumination_percent <= 1);
    assert!((14..=16).contains(&new.days_until_full_moon));
}

#[test]
fn test_malformed_location_matches_fallback_location() {
    let at = Utc.with_ymd_and_hms(2025, 4, 12, 21, 30, 0).single();
    let fallback = compute_moon_state(51.5074, -0.1278, at);
    for (lat, lon) in [(f64::NAN, 0.0), (91.0, 0.0), (0.0, -181.0), (f64::INFINITY, f64::NAN)] {
        assert_eq!(compute_moon_state(lat, lon, at), fallback);
    }
}

#[test]
fn test_state_round_trips_through_json() {
    // Full-precision altitudes must survive `status --json` exactly.
    let state = compute_moon_state(
        40.7128,
        -74.006,
        Utc.with_ymd_and_hms(2025, 7, 10, 3, 0, 0).single(),
    );
    let json = serde_json::to_string(&state).unwrap();
    let back: MoonState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

proptest! {
    #[test]
    fn prop_state_json_is_lossless(
        lat in latitude_strategy(),
        lon in longitude_strategy(),
        at in instant_strategy(),
    ) {
        let state = compute_moon_state(lat, lon, Some(at));
        let back: MoonState = serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        prop_assert_eq!(back, state);
    }

    #[test]
    fn prop_classification_is_total(phase in 0.0f64..=1.0) {
        // Every phase maps to a band, and the glyph/label are always present.
        let name = classify_phase(phase);
        prop_assert!(!name.label().is_empty());
        prop_assert!(!name.glyph().is_empty());
    }

    #[test]
    fn prop_days_until_full_moon_bounded(phase in 0.0f64..=1.0) {
        prop_assert!(days_until_full_moon(phase) <= 30);
    }

    #[test]
    fn prop_sprite_index_in_sheet(phase in 0.0f64..=1.0) {
        let index = sprite_index(phase);
        prop_assert!((1..=30).contains(&index));
    }

    #[test]
    fn prop_ephemeris_samples_are_physical(
        lat in latitude_strategy(),
        lon in longitude_strategy(),
        at in instant_strategy()
    ) {
        let ephemeris = Ephemeris::default();

        let illumination = ephemeris.illumination(at).unwrap();
        prop_assert!((0.0..=1.0).contains(&illumination.fraction));
        prop_assert!((0.0..=1.0).contains(&illumination.phase));

        let position = ephemeris.position(at, lat, lon).unwrap();
        prop_assert!((356_000.0..407_000.0).contains(&position.distance_km));
        prop_assert!(position.altitude_radians.abs() <= std::f64::consts::FRAC_PI_2 + 0.01);
    }

    #[test]
    fn prop_rise_set_fall_in_the_utc_day(
        lat in -60.0f64..=60.0,
        lon in longitude_strategy(),
        at in instant_strategy()
    ) {
        let times = Ephemeris::default().rise_set(at, lat, lon).unwrap();
        let day_start = at.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
        let day_end = day_start + Duration::hours(24);
        for instant in [times.rise, times.set].into_iter().flatten() {
            prop_assert!(instant >= day_start && instant <= day_end);
        }
    }

    #[test]
    fn prop_state_invariants(
        lat in latitude_strategy(),
        lon in longitude_strategy(),
        at in instant_strategy()
    ) {
        let state = compute_moon_state(lat, lon, Some(at));
        prop_assert!(state.illumination_percent <= 100);
        prop_assert!(state.radiance_score >= f64::from(state.illumination_percent) - 0.05);
        prop_assert!(state.radiance_score <= 100.0);
        prop_assert_eq!(
            state.visibility_duration_hours.is_some(),
            state.moonrise.is_some() && state.moonset.is_some()
        );
        prop_assert_eq!(state.is_visible(), state.altitude_degrees > 0.0);
    }
}
