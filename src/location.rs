//! Observer location resolution.
//!
//! The location comes from the first source that has one: command line,
//! configuration file, the last location remembered in the state store, and
//! finally the fallback location. Coordinates given on the command line are
//! remembered for later runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::LOCATION_KEY;
use crate::moon::Observer;
use crate::moon::sanitize::{is_valid_latitude, is_valid_longitude};
use crate::notify::KeyValueStore;

/// Where a resolved location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    CommandLine,
    Config,
    LastKnown,
    Fallback,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CommandLine => "command line",
            Self::Config => "configuration",
            Self::LastKnown => "last known location",
            Self::Fallback => "fallback location",
        })
    }
}

/// Stored form of the last known location.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLocation {
    lat: f64,
    lon: f64,
}

/// Read the remembered location. Missing, unreadable or invalid entries are `None`.
pub fn load_last_location(store: &impl KeyValueStore) -> Option<Observer> {
    let raw = match store.get(LOCATION_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            log_debug!("Last known location unavailable: {e:#}");
            return None;
        }
    };

    let stored: StoredLocation = match serde_json::from_str(&raw) {
        Ok(stored) => stored,
        Err(e) => {
            log_debug!("Ignoring malformed stored location {raw:?}: {e}");
            return None;
        }
    };

    (is_valid_latitude(stored.lat) && is_valid_longitude(stored.lon))
        .then(|| Observer::sanitize(stored.lat, stored.lon))
}

/// Remember `observer` as the last known location.
pub fn save_last_location(store: &impl KeyValueStore, observer: Observer) -> Result<()> {
    let json = serde_json::to_string(&StoredLocation {
        lat: observer.latitude,
        lon: observer.longitude,
    })?;
    store
        .set(LOCATION_KEY, &json)
        .context("Failed to remember location")
}

/// Pick the observer location by precedence.
///
/// `cli` and `config` are raw coordinate pairs; they are sanitized here, so
/// an out-of-range pair resolves to the fallback location but keeps its
/// source. Command line coordinates are saved to the store when usable.
pub fn resolve_location(
    cli: Option<(f64, f64)>,
    config: Option<(f64, f64)>,
    store: &impl KeyValueStore,
) -> (Observer, LocationSource) {
    if let Some((lat, lon)) = cli {
        let observer = Observer::sanitize(lat, lon);
        if is_valid_latitude(lat)
            && is_valid_longitude(lon)
            && let Err(e) = save_last_location(store, observer)
        {
            log_warning!("{e:#}");
        }
        return (observer, LocationSource::CommandLine);
    }

    if let Some((lat, lon)) = config {
        return (Observer::sanitize(lat, lon), LocationSource::Config);
    }

    if let Some(observer) = load_last_location(store) {
        return (observer, LocationSource::LastKnown);
    }

    (Observer::FALLBACK, LocationSource::Fallback)
}
