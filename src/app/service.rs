//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns the velocity governor and the mode machine and
//! implements the body of one control tick.  All I/O flows through port
//! traits injected at call sites, making the whole tick testable with
//! mock adapters.
//!
//! ```text
//!  ModeFlags (ISR) ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                      │      ControlService       │
//!  MotorPort ◀────────│  Governor · ModeMachine   │
//!  IndicatorPort ◀────└──────────────────────────┘
//! ```

use log::{debug, info};

use crate::config::SystemConfig;
use crate::control::governor::VelocityGovernor;
use crate::control::mode::{ModeAction, ModeFlags, ModeMachine, RunState};

use super::events::AppEvent;
use super::ports::{EventSink, IndicatorPort, MotorPort};

/// The control service orchestrates one tick of domain logic.
pub struct ControlService {
    governor: VelocityGovernor,
    mode: ModeMachine,
    period_ms: u32,
    tick_count: u64,
    /// Ceiling applied on the last tick.
    velocity_limit: f32,
}

impl ControlService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            governor: VelocityGovernor::new(
                config.velocity_limit_ratio,
                config.acceleration_limit_ratio,
            ),
            mode: ModeMachine::new(),
            period_ms: config.tick_period_ms,
            tick_count: 0,
            velocity_limit: 0.0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the motor into its startup configuration with every output
    /// off.
    pub fn start(
        &mut self,
        hw: &mut (impl MotorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        self.governor.apply_startup_limits(hw);
        if let Ok(limit) = self.governor.apply(hw) {
            self.velocity_limit = limit;
        }
        hw.set_task_indicator(false);
        hw.disable();
        sink.emit(&AppEvent::Started {
            period_ms: self.period_ms,
        });
        info!("ControlService started ({} ms tick)", self.period_ms);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control tick: governor → mode machine → status → heartbeat.
    ///
    /// The `hw` parameter satisfies **both** [`MotorPort`] and
    /// [`IndicatorPort`]; this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        flags: &ModeFlags,
        hw: &mut (impl MotorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Velocity ceiling, regardless of mode
        match self.governor.apply(hw) {
            Ok(limit) => self.velocity_limit = limit,
            Err(e) => {
                debug!("Governor fault: {}", e);
                self.velocity_limit = 0.0;
                sink.emit(&AppEvent::GovernorFault(e));
            }
        }

        // 2. Mode machine
        let from = self.mode.applied();
        let action = self.mode.evaluate(flags);
        Self::apply_mode(action, hw);
        let to = self.mode.applied();
        if from != to || action.resets() {
            debug!("Mode {:?} -> {:?} ({:?})", from, to, action);
            sink.emit(&AppEvent::ModeChanged { from, to, action });
        }

        // 3. Status line
        sink.emit(&AppEvent::Status {
            velocity: hw.velocity(),
        });

        // 4. Heartbeat
        hw.toggle_heartbeat();
    }

    // ── Queries ───────────────────────────────────────────────

    /// Run state the outputs currently reflect.
    pub fn run_state(&self) -> RunState {
        self.mode.applied()
    }

    /// Ceiling applied on the last tick.
    pub fn velocity_limit(&self) -> f32 {
        self.velocity_limit
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// One-shot resets performed since startup.
    pub fn reset_count(&self) -> u32 {
        self.mode.reset_count()
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_mode(action: ModeAction, hw: &mut (impl MotorPort + IndicatorPort)) {
        match action {
            ModeAction::Hold => {}
            ModeAction::Enter => {
                Self::reset_outputs(hw);
                Self::assert_running(hw);
            }
            ModeAction::Run => Self::assert_running(hw),
            ModeAction::Stop | ModeAction::Reset => Self::reset_outputs(hw),
        }
    }

    fn assert_running(hw: &mut (impl MotorPort + IndicatorPort)) {
        hw.set_task_indicator(true);
        if !hw.is_enabled() {
            hw.enable();
        }
    }

    fn reset_outputs(hw: &mut (impl MotorPort + IndicatorPort)) {
        hw.set_task_indicator(false);
        if hw.is_enabled() {
            hw.disable();
        }
    }
}
