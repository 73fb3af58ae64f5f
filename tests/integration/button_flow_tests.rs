//! End-to-end: button edges → debounced callback → mode flags → control
//! tick → motor outputs.

use crate::mock_hw::{HwCall, MockHardware, RecordingSink};

use motorgate::app::service::ControlService;
use motorgate::config::SystemConfig;
use motorgate::control::mode::{ModeFlags, RunState};
use motorgate::drivers::button::EdgeDetector;

static FLAGS: ModeFlags = ModeFlags::new();

fn on_press() {
    FLAGS.toggle();
}

#[test]
fn bouncy_press_toggles_once_and_starts_motor() {
    let button = EdgeDetector::new(50);
    button.fall(on_press);

    let mut svc = ControlService::new(&SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, &mut sink);

    // Contact bounce: four edges within 8 ms.
    for t in [1_000, 1_002, 1_005, 1_008] {
        button.on_falling_edge(t);
    }
    assert_eq!(button.accepted_edges(), 1);
    assert_eq!(FLAGS.run_state(), RunState::Running);

    svc.tick(&FLAGS, &mut hw, &mut sink);
    svc.tick(&FLAGS, &mut hw, &mut sink);
    assert!(hw.enabled());
    assert_eq!(hw.count(&HwCall::Enable), 1);

    // Second press well after the debounce window stops the motor.
    button.on_falling_edge(2_000);
    svc.tick(&FLAGS, &mut hw, &mut sink);
    assert!(!hw.enabled());
    assert_eq!(FLAGS.run_state(), RunState::Idle);
    assert_eq!(svc.run_state(), RunState::Idle);
}
