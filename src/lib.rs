//! # smoon
//!
//! Real-time lunar state for a location, and moon notifications.
//!
//! The library backs the `smoon` binary and keeps the logic testable apart
//! from CLI dispatch (main.rs).
//!
//! ## Architecture
//!
//! - **Metrics engine**: [`moon`] turns astronomical primitives into a
//!   [`MoonState`] (phase, illumination, rise/set, visibility, radiance).
//!   The built-in [`moon::Ephemeris`] supplies the primitives.
//! - **Notification scheduler**: [`notify`] decides when to show the
//!   "moon visible" and "high illumination" notifications, with cooldowns
//!   kept in a key-value store.
//! - **Commands**: [`commands`] implements `status`, `watch` and `help`.
//! - **Infrastructure**: configuration, location resolution, the watch lock,
//!   logging and the time source.

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod io;
pub mod location;
pub mod moon;
pub mod notify;
pub mod time_source;

pub use moon::{MoonEngine, MoonState, PhaseName, compute_moon_state};
pub use notify::{Decision, NotificationKind, Scheduler};
