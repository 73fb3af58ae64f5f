//! Single-colour indicator LEDs on plain GPIO outputs.
//!
//! [`GpioLine`] exposes an ESP-IDF output pin through the `embedded-hal`
//! digital traits; [`Led`] works over any stateful output pin so it can be
//! exercised on the host with a fake pin.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

use crate::drivers::hw_init;

/// A GPIO configured as push-pull output by `hw_init`.
pub struct GpioLine {
    pin: i32,
    high: bool,
}

impl GpioLine {
    pub fn new(pin: i32) -> Self {
        Self { pin, high: false }
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }
}

impl ErrorType for GpioLine {
    type Error = Infallible;
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false);
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true);
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for GpioLine {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

/// Active-high indicator LED.
pub struct Led<P> {
    pin: P,
}

impl<P: StatefulOutputPin> Led<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        if on { self.pin.set_high() } else { self.pin.set_low() }
    }

    pub fn toggle(&mut self) -> Result<(), P::Error> {
        self.pin.toggle()
    }

    pub fn is_on(&mut self) -> Result<bool, P::Error> {
        self.pin.is_set_high()
    }
}

impl Led<GpioLine> {
    /// LED on a board GPIO, switched off.
    pub fn on_gpio(pin: i32) -> Self {
        let mut led = Self::new(GpioLine::new(pin));
        never_fails(led.set(false));
        led
    }
}

/// Unwrap a result whose error type cannot be constructed.
pub fn never_fails<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
