//! Geared DC motor driver with quadrature encoder (H-bridge, LEDC PWM).
//!
//! Velocities are rotations per second at the gearbox output.  The bridge
//! is driven in locked-antiphase: duty 128 is standstill, 0 and 255 are
//! full reverse and full forward.
//!
//! The encoder ISR increments or decrements an atomic counter on each
//! rising edge of channel A; [`DcMotor::update`] samples and resets it
//! once per tick.  The measured velocity divides those counts by the
//! uptime elapsed since the previous sample, so a late tick does not
//! inflate the reading.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM via hw_init helpers.
//! On host/test: tracks state in-memory only.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::error::ActuatorError;

/// Duty that holds the bridge at standstill.
const DUTY_STANDSTILL: u8 = 128;

/// Signed encoder edge counter.
/// `static` because ISR callbacks in ESP-IDF cannot capture closures.
static ENCODER_COUNT: AtomicI32 = AtomicI32::new(0);

/// Called from the GPIO ISR on each rising edge of encoder channel A.
/// `forward` is the level of channel B at that instant.
pub fn encoder_isr_handler(forward: bool) {
    ENCODER_COUNT.fetch_add(if forward { 1 } else { -1 }, Ordering::Relaxed);
}

/// Static motor parameters, taken from [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorParams {
    pub gear_ratio: f32,
    pub kn_rpm_per_volt: f32,
    pub max_acceleration: f32,
    pub counts_per_rev: u32,
}

impl MotorParams {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            gear_ratio: config.gear_ratio,
            kn_rpm_per_volt: config.kn_rpm_per_volt,
            max_acceleration: config.max_acceleration_rps2,
            counts_per_rev: config.encoder_counts_per_rev,
        }
    }

    /// Encoder counts per gearbox output revolution.
    fn counts_per_output_rev(&self) -> f32 {
        self.counts_per_rev as f32 * self.gear_ratio
    }
}

pub struct DcMotor {
    params: MotorParams,
    supply_voltage: f32,
    max_velocity: f32,
    max_acceleration: f32,
    planner: bool,
    driving: bool,
    /// Velocity requested by the application.
    target: f32,
    /// Velocity currently commanded to the bridge (planner output).
    commanded: f32,
    /// Velocity measured from the encoder on the last update.
    measured: f32,
    /// Uptime of the previous encoder sample.
    last_sample_us: Option<u64>,
    hw_duty: u8,
}

impl DcMotor {
    pub fn new(params: MotorParams, supply_voltage: f32) -> Self {
        let mut motor = Self {
            params,
            supply_voltage,
            max_velocity: 0.0,
            max_acceleration: params.max_acceleration,
            planner: false,
            driving: false,
            target: 0.0,
            commanded: 0.0,
            measured: 0.0,
            last_sample_us: None,
            hw_duty: DUTY_STANDSTILL,
        };
        motor.max_velocity = motor.physical_max_velocity();
        motor
    }

    /// Highest output velocity the motor can reach at the current supply.
    pub fn physical_max_velocity(&self) -> f32 {
        self.params.kn_rpm_per_volt * self.supply_voltage / 60.0
    }

    // ── Limits ────────────────────────────────────────────────

    pub fn set_max_velocity(&mut self, velocity: f32) {
        self.max_velocity = velocity.max(0.0);
    }

    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    pub fn set_max_acceleration(&mut self, acceleration: f32) {
        self.max_acceleration = acceleration.max(0.0);
    }

    pub fn max_acceleration(&self) -> f32 {
        self.max_acceleration
    }

    pub fn enable_motion_planner(&mut self) {
        self.planner = true;
    }

    pub fn motion_planner_enabled(&self) -> bool {
        self.planner
    }

    // ── Drive ─────────────────────────────────────────────────

    /// Request an output velocity.  Clamped to the ceiling on every update.
    pub fn set_target_velocity(&mut self, velocity: f32) -> Result<(), ActuatorError> {
        if !velocity.is_finite() {
            return Err(ActuatorError::InvalidVelocity);
        }
        self.target = velocity;
        Ok(())
    }

    /// Connect the planner output to the bridge.
    pub fn start(&mut self) {
        self.driving = true;
    }

    /// Park the bridge at standstill and drop the planner state.
    pub fn stop(&mut self) {
        self.driving = false;
        self.target = 0.0;
        self.commanded = 0.0;
        self.set_duty_hw(DUTY_STANDSTILL);
    }

    pub fn is_driving(&self) -> bool {
        self.driving
    }

    /// Sample the encoder at uptime `now_us` and advance the motion
    /// planner by the time since the previous sample.
    pub fn update(&mut self, now_us: u64) {
        let counts = ENCODER_COUNT.swap(0, Ordering::Relaxed);
        self.apply_sample(counts, now_us);
    }

    fn apply_sample(&mut self, counts: i32, now_us: u64) {
        let Some(last_us) = self.last_sample_us.replace(now_us) else {
            // First sample only sets the time base.
            self.measured = 0.0;
            return;
        };
        let dt_secs = now_us.saturating_sub(last_us) as f32 / 1_000_000.0;
        self.measured = velocity_from_counts(counts, dt_secs, self.params.counts_per_output_rev());

        if !self.driving {
            return;
        }

        let goal = self.target.clamp(-self.max_velocity, self.max_velocity);
        self.commanded = if self.planner {
            let step = self.max_acceleration * dt_secs;
            self.commanded + (goal - self.commanded).clamp(-step, step)
        } else {
            goal
        };
        self.set_duty_hw(duty_for(self.commanded, self.physical_max_velocity()));
    }

    /// Measured output velocity.
    pub fn velocity(&self) -> f32 {
        self.measured
    }

    /// Planner output currently sent to the bridge.
    pub fn commanded_velocity(&self) -> f32 {
        self.commanded
    }

    pub fn current_duty(&self) -> u8 {
        self.hw_duty
    }

    fn set_duty_hw(&mut self, duty: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_MOTOR, duty);
        self.hw_duty = duty;
    }
}

/// Output rotations per second from an encoder delta.
fn velocity_from_counts(counts: i32, dt_secs: f32, counts_per_output_rev: f32) -> f32 {
    if dt_secs > 0.0 && counts_per_output_rev > 0.0 {
        counts as f32 / counts_per_output_rev / dt_secs
    } else {
        0.0
    }
}

/// Locked-antiphase duty for a velocity command.
fn duty_for(velocity: f32, physical_max: f32) -> u8 {
    if physical_max <= 0.0 {
        return DUTY_STANDSTILL;
    }
    let fraction = (velocity / physical_max).clamp(-1.0, 1.0);
    (f32::from(DUTY_STANDSTILL) + fraction * 127.0).round() as u8
}
