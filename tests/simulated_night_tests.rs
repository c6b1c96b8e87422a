use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use smoon::commands::watch::run_cycle;
use smoon::compute_moon_state;
use smoon::moon::{Ephemeris, MoonEngine, Observer};
use smoon::notify::{MemoryStore, NotificationPlatform, Permission, Scheduler};
use smoon::time_source::{self, FixedTimeSource};
use std::cell::RefCell;
use std::sync::Arc;

#[derive(Default)]
struct CollectingPlatform {
    tags: RefCell<Vec<String>>,
}

impl NotificationPlatform for CollectingPlatform {
    fn query_permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn dispatch(&self, _title: &str, _body: &str, tag: &str) -> Result<()> {
        self.tags.borrow_mut().push(tag.to_string());
        Ok(())
    }
}

// One test per binary: the time source is process-global and set once.
#[test]
fn test_simulated_full_moon_night() {
    // Full moon of 2024-01-25, evening in Paris.
    let start = Utc.with_ymd_and_hms(2024, 1, 25, 16, 0, 0).unwrap();
    assert!(!time_source::is_initialized());
    time_source::init_time_source(Arc::new(FixedTimeSource::new(start)));
    assert!(time_source::is_initialized());

    // A missing instant means the time source's "now".
    assert_eq!(
        compute_moon_state(48.8566, 2.3522, None),
        compute_moon_state(48.8566, 2.3522, Some(start))
    );

    let observer = Observer::sanitize(48.8566, 2.3522);
    let engine = MoonEngine::new(Ephemeris::default());
    let scheduler = Scheduler::new(MemoryStore::new(), CollectingPlatform::default());

    let mut visible_cycles = 0;
    // Twelve hours at the default five-minute refresh.
    for _ in 0..144 {
        let now = time_source::now();
        let report = run_cycle(&engine, &scheduler, observer, now);
        assert!(report.state.illumination_percent >= 95);
        if report.state.is_visible() {
            visible_cycles += 1;
        }
        time_source::sleep(std::time::Duration::from_secs(300));
    }

    assert_eq!(time_source::now(), start + Duration::hours(12));
    assert!(visible_cycles > 0, "the full moon should rise over Paris that night");

    let tags = scheduler.platform().tags.borrow();
    // Twelve hours: one bright-moon alert, and the visible alert at most twice (6 h cooldown).
    assert_eq!(tags.iter().filter(|t| *t == "high-illumination").count(), 1);
    let visible = tags.iter().filter(|t| *t == "moon-visible").count();
    assert!((1..=2).contains(&visible), "moon-visible fired {visible} times");
}
