//! Integration tests for the ControlService → MotorPort/IndicatorPort
//! pipeline, driven through the shared mode flags the button ISR writes.

use crate::mock_hw::{HwCall, MockHardware, RecordingSink};

use motorgate::app::events::AppEvent;
use motorgate::app::service::ControlService;
use motorgate::config::SystemConfig;
use motorgate::control::mode::{ModeAction, ModeFlags, RunState};

fn started() -> (ControlService, ModeFlags, MockHardware, RecordingSink) {
    let mut svc = ControlService::new(&SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, &mut sink);
    hw.clear();
    sink.events.clear();
    (svc, ModeFlags::new(), hw, sink)
}

#[test]
fn start_halves_acceleration_and_leaves_motor_off() {
    let mut svc = ControlService::new(&SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, &mut sink);

    assert_eq!(hw.count(&HwCall::EnablePlanner), 1);
    assert!(hw.calls.contains(&HwCall::SetMaxAcceleration(5.0)));
    assert!(!hw.enabled());
    assert!(!hw.task_indicator());
    assert_eq!(sink.events, vec![AppEvent::Started { period_ms: 20 }]);
}

#[test]
fn one_press_enables_exactly_once_and_clears_pending_reset() {
    let (mut svc, flags, mut hw, mut sink) = started();

    flags.toggle();
    svc.tick(&flags, &mut hw, &mut sink);
    assert!(!flags.snapshot().pending_reset);
    assert_eq!(svc.run_state(), RunState::Running);

    for _ in 0..10 {
        svc.tick(&flags, &mut hw, &mut sink);
    }
    assert_eq!(hw.count(&HwCall::Enable), 1);
    assert!(hw.enabled());
    assert!(hw.task_indicator());
    assert_eq!(svc.reset_count(), 1);
}

#[test]
fn second_press_disables_and_clears_indicator() {
    let (mut svc, flags, mut hw, mut sink) = started();

    flags.toggle();
    svc.tick(&flags, &mut hw, &mut sink);
    flags.toggle();
    svc.tick(&flags, &mut hw, &mut sink);
    svc.tick(&flags, &mut hw, &mut sink);

    assert!(!hw.enabled());
    assert!(!hw.task_indicator());
    assert_eq!(hw.count(&HwCall::Disable), 1);
    assert_eq!(svc.run_state(), RunState::Idle);
}

#[test]
fn governor_tracks_supply_every_tick_even_when_idle() {
    let (mut svc, flags, mut hw, mut sink) = started();

    svc.tick(&flags, &mut hw, &mut sink);
    assert!((svc.velocity_limit() - 1.5).abs() < 1e-6);

    // Battery pack removed: 12 V → 6 V halves the physical maximum.
    hw.physical_max = 1.5;
    svc.tick(&flags, &mut hw, &mut sink);
    assert!((svc.velocity_limit() - 0.75).abs() < 1e-6);
    assert_eq!(hw.calls.iter().filter(|c| matches!(c, HwCall::SetMaxVelocity(_))).count(), 2);
    assert!(!hw.enabled());
}

#[test]
fn governor_ceiling_is_set_before_enable() {
    let (mut svc, flags, mut hw, mut sink) = started();

    flags.toggle();
    svc.tick(&flags, &mut hw, &mut sink);

    let ceiling = hw.calls.iter().position(|c| matches!(c, HwCall::SetMaxVelocity(_)));
    let enable = hw.calls.iter().position(|c| *c == HwCall::Enable);
    assert!(ceiling < enable);
}

#[test]
fn invalid_physical_max_forces_zero_ceiling() {
    let (mut svc, flags, mut hw, mut sink) = started();

    hw.physical_max = f32::NAN;
    svc.tick(&flags, &mut hw, &mut sink);

    assert_eq!(svc.velocity_limit(), 0.0);
    assert!(hw.calls.contains(&HwCall::SetMaxVelocity(0.0)));
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::GovernorFault(_)))
    );
}

#[test]
fn status_line_every_tick_with_measured_velocity() {
    let (mut svc, flags, mut hw, mut sink) = started();

    hw.measured = 0.5;
    for _ in 0..3 {
        svc.tick(&flags, &mut hw, &mut sink);
    }
    assert_eq!(sink.status_lines(), 3);
    assert!(sink.lines().iter().all(|l| l == "Motor velocity: 0.500000"));
}

#[test]
fn heartbeat_toggles_every_tick_regardless_of_mode() {
    let (mut svc, flags, mut hw, mut sink) = started();

    svc.tick(&flags, &mut hw, &mut sink);
    flags.toggle();
    svc.tick(&flags, &mut hw, &mut sink);
    svc.tick(&flags, &mut hw, &mut sink);

    assert_eq!(hw.count(&HwCall::Heartbeat), 3);
    assert!(hw.heartbeat());
}

#[test]
fn mode_change_is_reported_once() {
    let (mut svc, flags, mut hw, mut sink) = started();

    flags.toggle();
    for _ in 0..4 {
        svc.tick(&flags, &mut hw, &mut sink);
    }
    let changes: Vec<_> = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::ModeChanged { .. }))
        .collect();
    assert_eq!(
        changes,
        vec![&AppEvent::ModeChanged {
            from: RunState::Idle,
            to: RunState::Running,
            action: ModeAction::Enter,
        }]
    );
}

#[test]
fn press_pair_between_ticks_resets_without_enabling() {
    let (mut svc, flags, mut hw, mut sink) = started();

    flags.toggle();
    flags.toggle();
    svc.tick(&flags, &mut hw, &mut sink);

    assert!(!hw.enabled());
    assert_eq!(hw.count(&HwCall::Enable), 0);
    assert_eq!(svc.reset_count(), 1);
    assert!(!flags.snapshot().pending_reset);
}
