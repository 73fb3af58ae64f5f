//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the motor, its power stage and the indicator LEDs, exposing them
//! through [`MotorPort`] and [`IndicatorPort`].  `enable`/`disable` switch
//! the power electronics and the bridge together, so the domain sees one
//! actuator.  On non-espidf targets, the underlying drivers use cfg-gated
//! simulation stubs.

use crate::app::ports::{IndicatorPort, MotorPort};
use crate::drivers::dc_motor::DcMotor;
use crate::drivers::hw_init;
use crate::drivers::led::{GpioLine, Led, never_fails};
use crate::drivers::power_stage::PowerStage;
use crate::error::ActuatorError;
use crate::pins;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    motor: DcMotor,
    power: PowerStage,
    heartbeat: Led<GpioLine>,
    task_led: Led<GpioLine>,
}

impl HardwareAdapter {
    pub fn new(motor: DcMotor, power: PowerStage) -> Self {
        Self {
            motor,
            power,
            heartbeat: Led::on_gpio(pins::HEARTBEAT_LED_GPIO),
            task_led: Led::on_gpio(pins::TASK_LED_GPIO),
        }
    }

    /// Advance the motor driver to uptime `now_us` (encoder sample + planner).
    pub fn update(&mut self, now_us: u64) {
        self.motor.update(now_us);
    }

    /// Velocity the motor drives towards while enabled, before the ceiling.
    pub fn set_target_velocity(&mut self, velocity: f32) -> Result<(), ActuatorError> {
        self.motor.set_target_velocity(velocity)
    }

    /// Level of the mechanical button (active low).
    pub fn mech_button_pressed(&self) -> bool {
        !hw_init::gpio_read(pins::MECH_BUTTON_GPIO)
    }

    pub fn motor(&self) -> &DcMotor {
        &self.motor
    }

    pub fn power(&self) -> &PowerStage {
        &self.power
    }
}

// ── MotorPort implementation ──────────────────────────────────

impl MotorPort for HardwareAdapter {
    fn enable(&mut self) {
        self.power.enable();
        self.motor.start();
    }

    fn disable(&mut self) {
        self.motor.stop();
        self.power.disable();
    }

    fn is_enabled(&self) -> bool {
        self.power.is_on()
    }

    fn physical_max_velocity(&self) -> f32 {
        self.motor.physical_max_velocity()
    }

    fn set_max_velocity(&mut self, velocity: f32) {
        self.motor.set_max_velocity(velocity);
    }

    fn max_velocity(&self) -> f32 {
        self.motor.max_velocity()
    }

    fn velocity(&self) -> f32 {
        self.motor.velocity()
    }

    fn max_acceleration(&self) -> f32 {
        self.motor.max_acceleration()
    }

    fn set_max_acceleration(&mut self, acceleration: f32) {
        self.motor.set_max_acceleration(acceleration);
    }

    fn enable_motion_planner(&mut self) {
        self.motor.enable_motion_planner();
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl IndicatorPort for HardwareAdapter {
    fn set_task_indicator(&mut self, on: bool) {
        never_fails(self.task_led.set(on));
    }

    fn toggle_heartbeat(&mut self) {
        never_fails(self.heartbeat.toggle());
    }
}
