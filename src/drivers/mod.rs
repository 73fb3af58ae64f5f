//! Actuator and indicator drivers, button input, and hardware initialisation.

pub mod button;
pub mod dc_motor;
pub mod hw_init;
pub mod led;
pub mod power_stage;
