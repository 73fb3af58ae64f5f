//! Motor power electronics enable line.
//!
//! The H-bridge supply is switched by a separate GPIO so the motor can be
//! de-energised independently of the PWM signal.  The control loop is
//! the only writer.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real enable GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use log::debug;

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    On,
}

pub struct PowerStage {
    state: PowerState,
    switch_count: u32,
}

impl Default for PowerStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerStage {
    pub fn new() -> Self {
        Self {
            state: PowerState::Off,
            switch_count: 0,
        }
    }

    pub fn enable(&mut self) {
        self.set(PowerState::On);
    }

    pub fn disable(&mut self) {
        self.set(PowerState::Off);
    }

    fn set(&mut self, state: PowerState) {
        hw_init::gpio_write(pins::MOTOR_ENABLE_GPIO, state == PowerState::On);
        if self.state != state {
            self.switch_count = self.switch_count.wrapping_add(1);
            debug!("Power stage {:?}", state);
        }
        self.state = state;
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state == PowerState::On
    }

    /// Number of on/off transitions since boot.
    pub fn switch_count(&self) -> u32 {
        self.switch_count
    }
}
