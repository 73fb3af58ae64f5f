//! Mock adapters for integration tests.
//!
//! Records every motor and indicator call so tests can assert on the full
//! command history without touching real GPIO/PWM registers.

use std::cell::Cell;
use std::rc::Rc;

use motorgate::app::events::AppEvent;
use motorgate::app::ports::{EventSink, IndicatorPort, MotorPort, TimePort};

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Enable,
    Disable,
    SetMaxVelocity(f32),
    SetMaxAcceleration(f32),
    EnablePlanner,
    TaskIndicator(bool),
    Heartbeat,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub physical_max: f32,
    pub measured: f32,
    enabled: bool,
    max_velocity: f32,
    max_acceleration: f32,
    task_indicator: bool,
    heartbeat: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            physical_max: 3.0,
            measured: 0.0,
            enabled: false,
            max_velocity: 0.0,
            max_acceleration: 10.0,
            task_indicator: false,
            heartbeat: false,
        }
    }

    pub fn count(&self, call: &HwCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn task_indicator(&self) -> bool {
        self.task_indicator
    }

    pub fn heartbeat(&self) -> bool {
        self.heartbeat
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorPort for MockHardware {
    fn enable(&mut self) {
        self.enabled = true;
        self.calls.push(HwCall::Enable);
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.calls.push(HwCall::Disable);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn physical_max_velocity(&self) -> f32 {
        self.physical_max
    }

    fn set_max_velocity(&mut self, velocity: f32) {
        self.max_velocity = velocity;
        self.calls.push(HwCall::SetMaxVelocity(velocity));
    }

    fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    fn velocity(&self) -> f32 {
        self.measured
    }

    fn max_acceleration(&self) -> f32 {
        self.max_acceleration
    }

    fn set_max_acceleration(&mut self, acceleration: f32) {
        self.max_acceleration = acceleration;
        self.calls.push(HwCall::SetMaxAcceleration(acceleration));
    }

    fn enable_motion_planner(&mut self) {
        self.calls.push(HwCall::EnablePlanner);
    }
}

impl IndicatorPort for MockHardware {
    fn set_task_indicator(&mut self, on: bool) {
        self.task_indicator = on;
        self.calls.push(HwCall::TaskIndicator(on));
    }

    fn toggle_heartbeat(&mut self) {
        self.heartbeat = !self.heartbeat;
        self.calls.push(HwCall::Heartbeat);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered serial lines, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|e| e.render().as_str().to_owned()).collect()
    }

    pub fn status_lines(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Status { .. }))
            .count()
    }

    pub fn overruns(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Overrun { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── ScriptedClock ─────────────────────────────────────────────

/// Clock that only moves when a test (or a sleep) moves it.
pub struct ScriptedClock {
    now: Rc<Cell<u64>>,
    pub sleeps: Vec<u64>,
}

#[allow(dead_code)]
impl ScriptedClock {
    /// Returns the clock and a handle the tick body can use to spend time.
    pub fn with_handle() -> (Self, Rc<Cell<u64>>) {
        let now = Rc::new(Cell::new(0));
        (
            Self {
                now: Rc::clone(&now),
                sleeps: Vec::new(),
            },
            now,
        )
    }
}

impl TimePort for ScriptedClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }

    fn sleep_us(&mut self, us: u64) {
        self.sleeps.push(us);
        self.now.set(self.now.get() + us);
    }
}
