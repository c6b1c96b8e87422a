//! Application-wide constants.
//!
//! Grouped by concern: lunar math, engine fallbacks, notification policy,
//! persistence keys and configuration limits.

// # Lunar math

/// Mean length of the synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.53;

/// Phase value at which the moon is full.
pub const FULL_MOON_PHASE: f64 = 0.5;

/// Lower edges of the phase bands, in ascending order. NewMoon wraps the 0/1 seam.
pub const WAXING_CRESCENT_START: f64 = 0.03;
pub const FIRST_QUARTER_START: f64 = 0.22;
pub const WAXING_GIBBOUS_START: f64 = 0.28;
pub const FULL_MOON_START: f64 = 0.47;
pub const WANING_GIBBOUS_START: f64 = 0.53;
pub const LAST_QUARTER_START: f64 = 0.72;
pub const WANING_CRESCENT_START: f64 = 0.78;
pub const NEW_MOON_START: f64 = 0.97;

/// Flat offset added to the illumination percentage for the radiance score.
pub const RADIANCE_BONUS: f64 = 5.0;
pub const RADIANCE_MAX: f64 = 100.0;

/// Number of frames in the moon sprite sheet.
pub const MOON_SPRITE_FRAMES: u8 = 30;

// # Engine fallbacks

/// Location used when the caller supplies unusable coordinates (London).
pub const FALLBACK_LATITUDE: f64 = 51.5074;
pub const FALLBACK_LONGITUDE: f64 = -0.1278;

/// Mean Earth-Moon distance in kilometres.
pub const DEFAULT_DISTANCE_KM: f64 = 384_400.0;

/// Days to full moon reported by the global fallback state.
pub const FALLBACK_DAYS_UNTIL_FULL_MOON: u32 = 15;

// # Notifications

pub const MOON_VISIBLE_COOLDOWN_HOURS: i64 = 6;
pub const HIGH_ILLUMINATION_COOLDOWN_HOURS: i64 = 24;

/// Illumination percentage at or above which the high illumination alert fires.
pub const HIGH_ILLUMINATION_THRESHOLD: u8 = 85;

pub const NOTIFICATION_TITLE: &str = "Smoon";
pub const NOTIFICATION_ICON: &str = "weather-clear-night";
pub const NOTIFICATION_EXPIRE_MS: i32 = 5_000;

// # Persistence keys

pub const MOON_VISIBLE_KEY: &str = "smoon_last_notification";
pub const HIGH_ILLUMINATION_KEY: &str = "smoon_high_illumination_notif";
pub const LOCATION_KEY: &str = "smoon_location";

// # Configuration

pub const DEFAULT_REFRESH_INTERVAL: u64 = 300; // seconds
pub const MINIMUM_REFRESH_INTERVAL: u64 = 30;
pub const MAXIMUM_REFRESH_INTERVAL: u64 = 3600;

pub const CONFIG_FILE_NAME: &str = "smoon.toml";
pub const STATE_FILE_NAME: &str = "state.json";

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
