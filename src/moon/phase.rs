//! Phase classification and cycle arithmetic.
//!
//! All functions here expect a phase value already clamped into [0, 1].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::*;

/// Named lunar phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseName {
    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PhaseName::NewMoon => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::FullMoon => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        }
    }

    /// Moon glyph matching the phase (northern hemisphere orientation).
    pub fn glyph(&self) -> &'static str {
        match self {
            PhaseName::NewMoon => "🌑",
            PhaseName::WaxingCrescent => "🌒",
            PhaseName::FirstQuarter => "🌓",
            PhaseName::WaxingGibbous => "🌔",
            PhaseName::FullMoon => "🌕",
            PhaseName::WaningGibbous => "🌖",
            PhaseName::LastQuarter => "🌗",
            PhaseName::WaningCrescent => "🌘",
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a phase value into one of the eight named bands.
///
/// Bands are tested in ascending order with strict upper bounds, so a value
/// sitting exactly on a boundary belongs to the band starting there. NewMoon
/// wraps the seam: anything below 0.03 or above 0.97.
pub fn classify_phase(phase: f64) -> PhaseName {
    if !(WAXING_CRESCENT_START..=NEW_MOON_START).contains(&phase) {
        PhaseName::NewMoon
    } else if phase < FIRST_QUARTER_START {
        PhaseName::WaxingCrescent
    } else if phase < WAXING_GIBBOUS_START {
        PhaseName::FirstQuarter
    } else if phase < FULL_MOON_START {
        PhaseName::WaxingGibbous
    } else if phase < WANING_GIBBOUS_START {
        PhaseName::FullMoon
    } else if phase < LAST_QUARTER_START {
        PhaseName::WaningGibbous
    } else if phase < WANING_CRESCENT_START {
        PhaseName::LastQuarter
    } else {
        PhaseName::WaningCrescent
    }
}

/// Whole days until the next full moon.
///
/// Past the full moon the count wraps forward to the next cycle. At exactly
/// 0.5 the moon is full now and the count is zero.
pub fn days_until_full_moon(phase: f64) -> u32 {
    let cycles = if phase <= FULL_MOON_PHASE {
        FULL_MOON_PHASE - phase
    } else {
        1.0 + FULL_MOON_PHASE - phase
    };

    (cycles * SYNODIC_MONTH_DAYS).round().max(0.0) as u32
}

/// Frame of the 30-frame moon sprite sheet for a phase, 1-based.
pub fn sprite_index(phase: f64) -> u8 {
    let index = (phase * f64::from(MOON_SPRITE_FRAMES)).floor() + 1.0;
    index.clamp(1.0, f64::from(MOON_SPRITE_FRAMES)) as u8
}
