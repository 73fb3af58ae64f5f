//! Velocity governor.
//!
//! Runs **every tick before the mode machine**, whether the task is
//! running or not, and re-derives the velocity ceiling from the motor's
//! current physical maximum.  The physical maximum follows the supply
//! voltage, so the ceiling is never cached.

use log::{info, warn};

use crate::app::ports::MotorPort;
use crate::error::ActuatorError;

/// Ceiling = `velocity_ratio × physical max`.
#[derive(Debug, Clone, Copy)]
pub struct VelocityGovernor {
    velocity_ratio: f32,
    acceleration_ratio: f32,
}

impl VelocityGovernor {
    pub fn new(velocity_ratio: f32, acceleration_ratio: f32) -> Self {
        Self {
            velocity_ratio,
            acceleration_ratio,
        }
    }

    pub fn velocity_ratio(&self) -> f32 {
        self.velocity_ratio
    }

    /// Pure ceiling computation.  A negative or non-finite physical
    /// maximum is rejected.
    pub fn ceiling(&self, physical_max: f32) -> Result<f32, ActuatorError> {
        if !physical_max.is_finite() || physical_max < 0.0 {
            return Err(ActuatorError::InvalidVelocity);
        }
        Ok(physical_max * self.velocity_ratio)
    }

    /// Apply the ceiling to the motor.  On error the ceiling is forced to
    /// zero for this tick and the error is returned for reporting.
    pub fn apply(&self, motor: &mut impl MotorPort) -> Result<f32, ActuatorError> {
        match self.ceiling(motor.physical_max_velocity()) {
            Ok(limit) => {
                motor.set_max_velocity(limit);
                Ok(limit)
            }
            Err(e) => {
                motor.set_max_velocity(0.0);
                Err(e)
            }
        }
    }

    /// One-time motor setup: enable the motion planner and scale the
    /// default max acceleration.
    pub fn apply_startup_limits(&self, motor: &mut impl MotorPort) {
        motor.enable_motion_planner();
        let accel = motor.max_acceleration() * self.acceleration_ratio;
        if accel.is_finite() && accel > 0.0 {
            motor.set_max_acceleration(accel);
            info!("Governor: max acceleration set to {:.3} rot/s^2", accel);
        } else {
            warn!("Governor: motor reported no usable max acceleration, left unchanged");
        }
    }
}
