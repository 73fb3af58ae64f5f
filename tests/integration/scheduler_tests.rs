//! Integration tests: PeriodicScheduler driving the ControlService.

use crate::mock_hw::{MockHardware, RecordingSink, ScriptedClock};

use motorgate::app::service::ControlService;
use motorgate::config::SystemConfig;
use motorgate::control::mode::ModeFlags;
use motorgate::scheduler::{PeriodicScheduler, TickOutcome};

#[test]
fn fast_tick_sleeps_remainder_without_warning() {
    let config = SystemConfig::default();
    let (mut clock, now) = ScriptedClock::with_handle();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::new();
    let mut svc = ControlService::new(&config);
    let flags = ModeFlags::new();
    let mut sched = PeriodicScheduler::new(config.tick_period_ms, 0);

    let outcome = sched.run_tick(&mut clock, &mut sink, |sink| {
        svc.tick(&flags, &mut hw, sink);
        now.set(now.get() + 5_000);
    });

    assert_eq!(
        outcome,
        TickOutcome::Slept {
            elapsed_us: 5_000,
            sleep_us: 15_000
        }
    );
    assert_eq!(clock.sleeps, vec![15_000]);
    assert_eq!(sink.overruns(), 0);
    assert_eq!(sink.status_lines(), 1);
}

#[test]
fn slow_tick_prints_warning_and_does_not_sleep() {
    let config = SystemConfig::default();
    let (mut clock, now) = ScriptedClock::with_handle();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::new();
    let mut svc = ControlService::new(&config);
    let flags = ModeFlags::new();
    let mut sched = PeriodicScheduler::new(config.tick_period_ms, 0);

    sched.run_tick(&mut clock, &mut sink, |sink| {
        svc.tick(&flags, &mut hw, sink);
        now.set(now.get() + 25_000);
    });

    assert!(clock.sleeps.is_empty());
    assert_eq!(sink.overruns(), 1);
    assert!(
        sink.lines()
            .contains(&"Warning: Main task took longer than 20 ms".to_owned())
    );
}

#[test]
fn ticks_follow_period_on_monotonic_clock() {
    let config = SystemConfig::default();
    let (mut clock, now) = ScriptedClock::with_handle();
    let mut sink = RecordingSink::new();
    let mut hw = MockHardware::new();
    let mut svc = ControlService::new(&config);
    let flags = ModeFlags::new();
    let mut sched = PeriodicScheduler::new(config.tick_period_ms, 0);

    for body_us in [1_000, 3_000, 7_000, 19_999] {
        sched.run_tick(&mut clock, &mut sink, |sink| {
            svc.tick(&flags, &mut hw, sink);
            now.set(now.get() + body_us);
        });
    }

    // Every tick took exactly one period of wall time.
    assert_eq!(now.get(), 4 * 20_000);
    assert_eq!(svc.tick_count(), 4);
    assert_eq!(sched.stats().overruns, 0);
    assert_eq!(sched.stats().max_elapsed_us, 19_999);
}
