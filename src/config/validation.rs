//! Configuration validation.

use anyhow::Result;

use super::Config;
use crate::constants::{MAXIMUM_REFRESH_INTERVAL, MINIMUM_REFRESH_INTERVAL};
use crate::moon::sanitize::{is_valid_latitude, is_valid_longitude};

/// Validate a parsed configuration.
///
/// A bad refresh interval or a half-specified location is an error.
/// Out-of-range coordinates only warn: the engine replaces them with the
/// fallback location at compute time.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.refresh_interval
        && !(MINIMUM_REFRESH_INTERVAL..=MAXIMUM_REFRESH_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "refresh_interval ({} s) must be between {} and {} seconds",
            interval,
            MINIMUM_REFRESH_INTERVAL,
            MAXIMUM_REFRESH_INTERVAL
        );
    }

    match (config.latitude, config.longitude) {
        (Some(_), None) => anyhow::bail!("latitude is set but longitude is missing"),
        (None, Some(_)) => anyhow::bail!("longitude is set but latitude is missing"),
        _ => {}
    }

    if let Some(lat) = config.latitude
        && !is_valid_latitude(lat)
    {
        log_warning!("latitude {lat} is outside -90 to 90 degrees, the fallback location will be used");
    }

    if let Some(lon) = config.longitude
        && !is_valid_longitude(lon)
    {
        log_warning!("longitude {lon} is outside -180 to 180 degrees, the fallback location will be used");
    }

    Ok(())
}
