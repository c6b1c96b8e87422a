//! Notification scheduler.
//!
//! Decides, on each evaluation, whether a moon notification should be shown.
//! Each [`NotificationKind`] is a small state machine: armed until it fires,
//! then cooling until its cooldown has elapsed since the last successful
//! dispatch. The last fire time is kept in an injected [`KeyValueStore`], so
//! cooldowns survive restarts when the store is persistent.
//!
//! Nothing here returns an error. Store and platform failures are logged and
//! resolved toward "show the notification" for reads and "try again later"
//! for dispatch.

pub mod platform;
pub mod store;


use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

use crate::constants::{
    HIGH_ILLUMINATION_COOLDOWN_HOURS, HIGH_ILLUMINATION_KEY, HIGH_ILLUMINATION_THRESHOLD,
    MOON_VISIBLE_COOLDOWN_HOURS, MOON_VISIBLE_KEY, NOTIFICATION_TITLE,
};
pub use platform::{DesktopNotifier, NotificationPlatform, Permission};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// The notifications smoon can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// The moon has risen above the horizon.
    MoonVisible,
    /// The moon is at least 85% illuminated.
    HighIllumination,
}

impl NotificationKind {
    pub fn cooldown(self) -> TimeDelta {
        match self {
            Self::MoonVisible => TimeDelta::hours(MOON_VISIBLE_COOLDOWN_HOURS),
            Self::HighIllumination => TimeDelta::hours(HIGH_ILLUMINATION_COOLDOWN_HOURS),
        }
    }

    /// Store key holding the last fire time in epoch milliseconds.
    pub fn store_key(self) -> &'static str {
        match self {
            Self::MoonVisible => MOON_VISIBLE_KEY,
            Self::HighIllumination => HIGH_ILLUMINATION_KEY,
        }
    }

    /// Platform tag; notifications with the same tag replace each other.
    pub fn tag(self) -> &'static str {
        match self {
            Self::MoonVisible => "moon-visible",
            Self::HighIllumination => "high-illumination",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MoonVisible => "moon visible",
            Self::HighIllumination => "high illumination",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why an evaluation did not show a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    BelowHorizon,
    BelowThreshold,
    PermissionDenied,
    CoolingDown { remaining: TimeDelta },
    DispatchFailed,
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowHorizon => f.write_str("moon below the horizon"),
            Self::BelowThreshold => f.write_str("illumination below threshold"),
            Self::PermissionDenied => f.write_str("permission not granted"),
            Self::CoolingDown { remaining } => {
                let minutes = remaining.num_minutes().max(1);
                write!(f, "cooling down, {}h {:02}m left", minutes / 60, minutes % 60)
            }
            Self::DispatchFailed => f.write_str("dispatch failed"),
        }
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fired,
    Suppressed(SuppressReason),
}

impl Decision {
    pub fn fired(&self) -> bool {
        matches!(self, Self::Fired)
    }
}

/// Per-kind cooldown scheduler over an injected store and platform.
pub struct Scheduler<S, N> {
    store: S,
    platform: N,
}

impl<S: KeyValueStore, N: NotificationPlatform> Scheduler<S, N> {
    pub fn new(store: S, platform: N) -> Self {
        Self { store, platform }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn platform(&self) -> &N {
        &self.platform
    }

    /// Notify that the moon is up, at most once every 6 hours.
    ///
    /// Asks for permission when it has not been decided yet.
    pub fn evaluate_moon_visible(&self, altitude_degrees: f64, now: DateTime<Utc>) -> Decision {
        let kind = NotificationKind::MoonVisible;
        if !altitude_degrees.is_finite() || altitude_degrees <= 0.0 {
            return self.suppress(kind, SuppressReason::BelowHorizon);
        }

        if !self.permission_granted(true) {
            return self.suppress(kind, SuppressReason::PermissionDenied);
        }
        if let Some(remaining) = self.cooling_remaining(kind, now) {
            return self.suppress(kind, SuppressReason::CoolingDown { remaining });
        }

        self.fire(kind, "The moon is visible tonight 🌙", now)
    }

    /// Notify about a bright moon (85% and up), at most once every 24 hours.
    ///
    /// Only fires when permission was already granted; never prompts. The
    /// platform is not consulted while the kind is cooling.
    pub fn evaluate_high_illumination(
        &self,
        illumination_percent: f64,
        now: DateTime<Utc>,
    ) -> Decision {
        let kind = NotificationKind::HighIllumination;
        if !illumination_percent.is_finite()
            || illumination_percent < f64::from(HIGH_ILLUMINATION_THRESHOLD)
        {
            return self.suppress(kind, SuppressReason::BelowThreshold);
        }

        if let Some(remaining) = self.cooling_remaining(kind, now) {
            return self.suppress(kind, SuppressReason::CoolingDown { remaining });
        }
        if !self.permission_granted(false) {
            return self.suppress(kind, SuppressReason::PermissionDenied);
        }

        let body = format!(
            "The moon is shining at {}% tonight ✨",
            illumination_percent.round()
        );
        self.fire(kind, &body, now)
    }

    /// Last successful fire of `kind`, if one is recorded and readable.
    pub fn last_fired(&self, kind: NotificationKind) -> Option<DateTime<Utc>> {
        let raw = match self.store.get(kind.store_key()) {
            Ok(raw) => raw?,
            Err(e) => {
                log_debug!("Treating {kind} as never fired, store unreadable: {e:#}");
                return None;
            }
        };

        let parsed = raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
        if parsed.is_none() {
            log_debug!("Ignoring malformed {kind} timestamp {raw:?}");
        }
        parsed
    }

    fn permission_granted(&self, may_request: bool) -> bool {
        match self.platform.query_permission() {
            Permission::Granted => true,
            Permission::Denied => false,
            Permission::Undecided if may_request => {
                self.platform.request_permission() == Permission::Granted
            }
            Permission::Undecided => false,
        }
    }

    /// Cooldown remaining for `kind` at `now`, or `None` when armed.
    fn cooling_remaining(&self, kind: NotificationKind, now: DateTime<Utc>) -> Option<TimeDelta> {
        let last = self.last_fired(kind)?;
        let elapsed = now - last;
        let cooldown = kind.cooldown();
        (elapsed < cooldown).then(|| cooldown - elapsed)
    }

    fn fire(&self, kind: NotificationKind, body: &str, now: DateTime<Utc>) -> Decision {
        if let Err(e) = self.platform.dispatch(NOTIFICATION_TITLE, body, kind.tag()) {
            log_warning!("Could not show {kind} notification: {e:#}");
            return Decision::Suppressed(SuppressReason::DispatchFailed);
        }
        log_info!("Notified: {body}");

        let stamp = now.timestamp_millis().to_string();
        if let Err(e) = self.store.set(kind.store_key(), &stamp) {
            log_warning!("Could not record {kind} notification time: {e:#}");
        }
        Decision::Fired
    }

    fn suppress(&self, kind: NotificationKind, reason: SuppressReason) -> Decision {
        log_debug!("Skipping {kind} notification: {reason}");
        Decision::Suppressed(reason)
    }
}
