//! Control logic: run/idle mode state machine and velocity governor.
//!
//! Pure domain code, no I/O.  Hardware is reached through the port
//! traits in [`crate::app::ports`].

pub mod governor;
pub mod mode;
