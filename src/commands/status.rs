//! `smoon status`: compute and print the lunar state once.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::args::RunOptions;
use crate::location::{LocationSource, resolve_location};
use crate::logger::Log;
use crate::moon::display::{format_clock, format_distance, format_visibility};
use crate::moon::sanitize::{instant_from_epoch_millis, resolve_instant};
use crate::moon::{MoonState, Observer};
use crate::time_source;

/// JSON form of a status report.
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub location_source: String,
    pub instant: DateTime<Utc>,
    #[serde(flatten)]
    pub state: &'a MoonState,
    pub visible: bool,
    pub sprite_index: u8,
}

impl<'a> StatusReport<'a> {
    pub fn new(
        state: &'a MoonState,
        observer: Observer,
        source: LocationSource,
        instant: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude: observer.latitude,
            longitude: observer.longitude,
            location_source: source.to_string(),
            instant,
            state,
            visible: state.is_visible(),
            sprite_index: state.sprite_index(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Interpret an `--at` value: local `YYYY-MM-DD HH:MM:SS` or epoch milliseconds.
///
/// Anything else means "now", with a warning.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    match time_source::parse_datetime(raw) {
        Ok(instant) => Some(instant),
        Err(e) => {
            let millis = raw.trim().parse::<f64>().ok().and_then(instant_from_epoch_millis);
            if millis.is_none() {
                log_warning!("Ignoring --at '{raw}': {e}");
            }
            millis
        }
    }
}

/// Run the status command.
pub fn run_status(options: &RunOptions, at: Option<&str>, json: bool) -> Result<()> {
    if json {
        Log::set_enabled(false);
    }

    let config = super::prepare(options)?;
    let store = config.state_store();
    let (observer, source) = resolve_location(options.coordinates, config.coordinates(), &store);

    let instant = resolve_instant(at.and_then(parse_instant));
    let state = super::local_engine(instant).compute_for(observer, instant);
    let report = StatusReport::new(&state, observer, source, instant);

    if json {
        println!("{}", report.to_json()?);
    } else {
        display_human(&report);
    }
    Ok(())
}

fn display_human(report: &StatusReport<'_>) {
    let state = report.state;
    println!(
        "{} {}  ({:.4}°, {:.4}° from {})",
        state.phase_name.glyph(),
        state.phase_name,
        report.latitude,
        report.longitude,
        report.location_source
    );
    println!(
        "          At: {}",
        report.instant.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!("Illumination: {}%", state.illumination_percent);
    println!("    Radiance: {:.1}", state.radiance_score);
    println!(
        "    Altitude: {:.1}° ({})",
        state.altitude_degrees,
        if state.is_visible() { "visible" } else { "below horizon" }
    );
    println!("    Moonrise: {}", format_clock(state.moonrise));
    println!("     Moonset: {}", format_clock(state.moonset));
    println!("  Visibility: {}", format_visibility(state.visibility_duration_hours));
    println!("   Full moon: in {} days", state.days_until_full_moon);
    println!("    Distance: {}", format_distance(state.distance_km));
}
