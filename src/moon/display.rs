//! Formatting helpers for computed moon states.

use chrono::{DateTime, Local, Utc};

use super::{MoonState, Observer};

/// Placeholder shown for values that do not exist (no rise, no set).
pub const MISSING: &str = "—";

/// Format an instant as local `HH:MM`, or the placeholder when absent.
pub fn format_clock(instant: Option<DateTime<Utc>>) -> String {
    match instant {
        Some(instant) => instant.with_timezone(&Local).format("%H:%M").to_string(),
        None => MISSING.to_string(),
    }
}

/// Format a visibility window like `11.5 h`.
pub fn format_visibility(hours: Option<f64>) -> String {
    match hours {
        Some(hours) => format!("{hours:.1} h"),
        None => MISSING.to_string(),
    }
}

/// Format a distance with thousands separators, e.g. `384,400 km`.
pub fn format_distance(distance_km: u32) -> String {
    let digits = distance_km.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped} km")
}

/// Log a computed state as a block.
pub fn log_moon_state(state: &MoonState, observer: Observer) {
    log_block_start!(
        "{} {} at {:.4}°, {:.4}°",
        state.phase_name.glyph(),
        state.phase_name,
        observer.latitude,
        observer.longitude
    );
    log_indented!("Illumination: {}%", state.illumination_percent);
    log_indented!("    Radiance: {:.1}", state.radiance_score);
    log_indented!("    Altitude: {:.1}°", state.altitude_degrees);
    log_indented!("    Moonrise: {}", format_clock(state.moonrise));
    log_indented!("     Moonset: {}", format_clock(state.moonset));
    log_indented!("  Visibility: {}", format_visibility(state.visibility_duration_hours));
    log_indented!("   Full moon: in {} days", state.days_until_full_moon);
    log_indented!("    Distance: {}", format_distance(state.distance_km));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_use_placeholder() {
        assert_eq!(format_clock(None), MISSING);
        assert_eq!(format_visibility(None), MISSING);
    }

    #[test]
    fn test_visibility_format() {
        assert_eq!(format_visibility(Some(11.5)), "11.5 h");
        assert_eq!(format_visibility(Some(0.0)), "0.0 h");
    }

    #[test]
    fn test_clock_format_shape() {
        let formatted = format_clock(Some(Utc::now()));
        assert_eq!(formatted.len(), 5);
        assert_eq!(&formatted[2..3], ":");
    }

    #[test]
    fn test_distance_grouping() {
        assert_eq!(format_distance(384_400), "384,400 km");
        assert_eq!(format_distance(999), "999 km");
        assert_eq!(format_distance(1_000), "1,000 km");
        assert_eq!(format_distance(0), "0 km");
    }
}
