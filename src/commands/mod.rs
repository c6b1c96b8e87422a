//! Command handlers for the smoon CLI.
//!
//! Each command lives in its own submodule. Shared setup (config directory,
//! debug flag, location and engine construction) is done here.

pub mod help;
pub mod status;
pub mod watch;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};

use crate::args::RunOptions;
use crate::config::{self, Config};
use crate::logger::Log;
use crate::moon::{Ephemeris, MoonEngine};

/// Apply the options every command shares and load the configuration.
pub(crate) fn prepare(options: &RunOptions) -> Result<Config> {
    if options.debug_enabled {
        Log::set_debug(true);
    }
    config::set_config_dir(options.config_dir.clone())?;
    Config::load()
}

/// Local UTC offset in effect at `instant`.
pub(crate) fn local_offset(instant: DateTime<Utc>) -> FixedOffset {
    Local.offset_from_utc_datetime(&instant.naive_utc())
}

/// Engine whose rise/set day follows the local calendar at `instant`.
pub(crate) fn local_engine(instant: DateTime<Utc>) -> MoonEngine<Ephemeris> {
    MoonEngine::new(Ephemeris::with_day_offset(local_offset(instant)))
}
