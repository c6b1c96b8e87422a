//! `smoon watch`: recompute on an interval and drive the notification
//! scheduler until SIGINT or SIGTERM.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::args::RunOptions;
use crate::config;
use crate::io::lock;
use crate::location::resolve_location;
use crate::moon::display::log_moon_state;
use crate::moon::{CelestialPrimitive, MoonEngine, MoonState, Observer};
use crate::notify::{Decision, DesktopNotifier, KeyValueStore, NotificationPlatform, Scheduler};
use crate::time_source;

/// Longest single sleep between shutdown-flag checks.
const SLEEP_SLICE: Duration = Duration::from_secs(1);

/// Outcome of one watch cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub state: MoonState,
    pub moon_visible: Decision,
    pub high_illumination: Decision,
}

/// Compute the state at `now` and offer it to the scheduler.
pub fn run_cycle<P, S, N>(
    engine: &MoonEngine<P>,
    scheduler: &Scheduler<S, N>,
    observer: Observer,
    now: DateTime<Utc>,
) -> CycleReport
where
    P: CelestialPrimitive,
    S: KeyValueStore,
    N: NotificationPlatform,
{
    let state = engine.compute_for(observer, now);
    let moon_visible = scheduler.evaluate_moon_visible(state.altitude_degrees, now);
    let high_illumination =
        scheduler.evaluate_high_illumination(f64::from(state.illumination_percent), now);

    CycleReport {
        state,
        moon_visible,
        high_illumination,
    }
}

/// Sleep for `duration`, waking early once `stop` is set.
fn sleep_until_stopped(duration: Duration, stop: &AtomicBool) {
    let mut remaining = duration;
    while !remaining.is_zero() && !stop.load(Ordering::SeqCst) {
        let slice = remaining.min(SLEEP_SLICE);
        time_source::sleep(slice);
        remaining -= slice;
    }
}

/// Run the watch loop.
pub fn run_watch(options: &RunOptions) -> Result<()> {
    log_version!();

    let config = super::prepare(options)?;
    let config_path = config::get_config_path()?;
    config.log_config(config_path.exists().then_some(config_path.as_path()));

    let watch_lock = lock::acquire_lock(&lock::default_lock_path())?;
    log_debug!("Holding watch lock at {}", watch_lock.path().display());

    let store = config.state_store();
    let (observer, source) = resolve_location(options.coordinates, config.coordinates(), &store);
    log_block_start!(
        "Watching from {:.4}°, {:.4}° ({source})",
        observer.latitude,
        observer.longitude
    );

    let scheduler = Scheduler::new(&store, DesktopNotifier::new(config.notifications()));
    let interval = Duration::from_secs(config.refresh_interval());
    log_decorated!("Refreshing every {}s, press Ctrl+C to stop", interval.as_secs());

    // Starts false, set by the signal handlers.
    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))?;

    while !stop.load(Ordering::SeqCst) {
        let now = time_source::now();
        let engine = super::local_engine(now);
        let report = run_cycle(&engine, &scheduler, observer, now);
        log_moon_state(&report.state, observer);

        sleep_until_stopped(interval, &stop);
    }

    log_block_start!("Stopped watching");
    log_end!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moon::{Illumination, Position, RiseSet};
    use crate::notify::platform::MockNotificationPlatform;
    use crate::notify::{MemoryStore, Permission, SuppressReason};
    use anyhow::Result;
    use chrono::{Duration as ChronoDuration, TimeZone};

    /// Primitive reporting a fixed bright moon high in the sky.
    struct BrightMoon;

    impl CelestialPrimitive for BrightMoon {
        fn illumination(&self, _: DateTime<Utc>) -> Result<Illumination> {
            Ok(Illumination {
                fraction: 0.93,
                phase: 0.47,
            })
        }

        fn rise_set(&self, _: DateTime<Utc>, _: f64, _: f64) -> Result<RiseSet> {
            Ok(RiseSet::default())
        }

        fn position(&self, _: DateTime<Utc>, _: f64, _: f64) -> Result<Position> {
            Ok(Position {
                altitude_radians: 0.6,
                distance_km: 370_000.0,
            })
        }
    }

    #[test]
    fn test_cycles_fire_once_per_cooldown() {
        let mut platform = MockNotificationPlatform::new();
        platform
            .expect_query_permission()
            .returning(|| Permission::Granted);
        platform
            .expect_dispatch()
            .times(2)
            .returning(|_, _, _| Ok(()));

        let engine = MoonEngine::new(BrightMoon);
        let scheduler = Scheduler::new(MemoryStore::new(), platform);
        let start = Utc.with_ymd_and_hms(2025, 4, 12, 22, 0, 0).unwrap();

        let first = run_cycle(&engine, &scheduler, Observer::FALLBACK, start);
        assert_eq!(first.state.illumination_percent, 93);
        assert!(first.moon_visible.fired());
        assert!(first.high_illumination.fired());

        // Every five minutes for the next hour: nothing new.
        for step in 1..=12 {
            let now = start + ChronoDuration::minutes(5 * step);
            let report = run_cycle(&engine, &scheduler, Observer::FALLBACK, now);
            assert!(matches!(
                report.moon_visible,
                Decision::Suppressed(SuppressReason::CoolingDown { .. })
            ));
            assert!(matches!(
                report.high_illumination,
                Decision::Suppressed(SuppressReason::CoolingDown { .. })
            ));
        }
    }

    #[test]
    fn test_sleep_returns_immediately_when_stopped() {
        let stop = AtomicBool::new(true);
        let before = std::time::Instant::now();
        sleep_until_stopped(Duration::from_secs(3600), &stop);
        assert!(before.elapsed() < Duration::from_secs(1));
    }
}
