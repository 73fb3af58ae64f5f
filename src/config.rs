//! System configuration parameters
//!
//! All tunable parameters for the MotorGate controller.  Values are
//! compile-time defaults; a JSON override document can be applied at
//! startup, but nothing is ever persisted.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Timing ---
    /// Control tick period (milliseconds).  20 ms = 50 ticks per second.
    pub tick_period_ms: u32,
    /// Tick statistics log interval (ticks).  0 disables the report.
    pub stats_interval_ticks: u32,

    // --- Governor ---
    /// Velocity ceiling as a fraction of the physical maximum (0 < k <= 1).
    pub velocity_limit_ratio: f32,
    /// Max acceleration as a fraction of the motor default (0 < k <= 1).
    pub acceleration_limit_ratio: f32,

    // --- Button ---
    /// Minimum spacing between two accepted falling edges (milliseconds).
    pub debounce_ms: u32,

    // --- Motor M1 ---
    /// Gearbox ratio (motor revolutions per output revolution).
    pub gear_ratio: f32,
    /// Motor constant at the gearbox output (rpm per volt).
    pub kn_rpm_per_volt: f32,
    /// Nominal supply voltage (V).  12 V with two battery packs, 6 V with one.
    pub supply_voltage_v: f32,
    /// Default max acceleration of the motion planner (rotations/s²).
    pub max_acceleration_rps2: f32,
    /// Encoder counts per motor shaft revolution.
    pub encoder_counts_per_rev: u32,
    /// Output velocity requested while the task runs (rotations/s).  The
    /// governor ceiling clamps it.
    pub target_velocity_rps: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_period_ms: 20,
            stats_interval_ticks: 250, // every 5 s at 20 ms

            // Governor
            velocity_limit_ratio: 0.5,
            acceleration_limit_ratio: 0.5,

            // Button
            debounce_ms: 50,

            // Motor M1
            gear_ratio: 78.125,
            kn_rpm_per_volt: 180.0 / 12.0,
            supply_voltage_v: 12.0,
            max_acceleration_rps2: 10.0,
            encoder_counts_per_rev: 20,
            target_velocity_rps: 3.0, // full speed, limited by the governor
        }
    }
}

impl SystemConfig {
    /// Parse a JSON override document.  Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_ms must be > 0"));
        }
        if !(self.velocity_limit_ratio > 0.0 && self.velocity_limit_ratio <= 1.0) {
            return Err(ConfigError::ValidationFailed(
                "velocity_limit_ratio must be in (0, 1]",
            ));
        }
        if !(self.acceleration_limit_ratio > 0.0 && self.acceleration_limit_ratio <= 1.0) {
            return Err(ConfigError::ValidationFailed(
                "acceleration_limit_ratio must be in (0, 1]",
            ));
        }
        if !(self.gear_ratio > 0.0 && self.gear_ratio.is_finite()) {
            return Err(ConfigError::ValidationFailed("gear_ratio must be > 0"));
        }
        if !(self.kn_rpm_per_volt > 0.0 && self.kn_rpm_per_volt.is_finite()) {
            return Err(ConfigError::ValidationFailed("kn_rpm_per_volt must be > 0"));
        }
        if !(self.supply_voltage_v > 0.0 && self.supply_voltage_v <= 48.0) {
            return Err(ConfigError::ValidationFailed(
                "supply_voltage_v must be in (0, 48]",
            ));
        }
        if !(self.max_acceleration_rps2 > 0.0 && self.max_acceleration_rps2.is_finite()) {
            return Err(ConfigError::ValidationFailed(
                "max_acceleration_rps2 must be > 0",
            ));
        }
        if self.encoder_counts_per_rev == 0 {
            return Err(ConfigError::ValidationFailed(
                "encoder_counts_per_rev must be > 0",
            ));
        }
        if !self.target_velocity_rps.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "target_velocity_rps must be finite",
            ));
        }
        Ok(())
    }

    /// Tick period in microseconds.
    pub fn tick_period_us(&self) -> u64 {
        u64::from(self.tick_period_ms) * 1000
    }
}
