//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (motor, indicators, status output, clock) implement
//! these traits.  The [`ControlService`](super::service::ControlService)
//! and the [`PeriodicScheduler`](crate::scheduler::PeriodicScheduler)
//! consume them via generics, so the control core never touches hardware
//! directly.

// ───────────────────────────────────────────────────────────────
// Motor port (actuator facade: domain → motor + power stage)
// ───────────────────────────────────────────────────────────────

/// Write/read port for a DC motor with an internal motion planner.
///
/// Velocities are rotations per second at the gearbox output and are
/// never negative when passed in.  Only the scheduler's thread of control
/// calls into this port.
pub trait MotorPort {
    /// Energise the power stage.
    fn enable(&mut self);

    /// De-energise the power stage.
    fn disable(&mut self);

    /// Whether the power stage is currently energised.
    fn is_enabled(&self) -> bool;

    /// Highest velocity the motor can physically reach right now
    /// (depends on supply voltage).
    fn physical_max_velocity(&self) -> f32;

    /// Set the commanded velocity ceiling of the motion planner.
    fn set_max_velocity(&mut self, velocity: f32);

    /// Current velocity ceiling.
    fn max_velocity(&self) -> f32;

    /// Measured velocity.
    fn velocity(&self) -> f32;

    /// Current max acceleration of the motion planner.
    fn max_acceleration(&self) -> f32;

    /// Set the max acceleration of the motion planner.
    fn set_max_acceleration(&mut self, acceleration: f32);

    /// Route velocity commands through the motion planner for smooth moves.
    fn enable_motion_planner(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Visual feedback outputs.
pub trait IndicatorPort {
    /// Light or clear the "task running" indicator.
    fn set_task_indicator(&mut self, on: bool);

    /// Flip the heartbeat LED.  Called once per tick.
    fn toggle_heartbeat(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → serial status output)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`AppEvent`](super::events::AppEvent)s through this
/// port.  Adapters decide where they go (serial log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port (scheduler ↔ monotonic clock)
// ───────────────────────────────────────────────────────────────

/// Monotonic clock plus the only blocking primitive in the loop.
pub trait TimePort {
    /// Microseconds since boot (monotonic).
    fn now_us(&self) -> u64;

    /// Suspend the calling task for `us` microseconds.
    fn sleep_us(&mut self, us: u64);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from configuration parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Override document failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
