//! GPIO cooling fan

use embedded_hal::digital::OutputPin;
use hotplate_core::traits::FanActuator;

/// Fan switched by a GPIO pin
pub struct GpioFan<P> {
    pin: P,
    /// If true, fan ON = pin LOW
    inverted: bool,
    on: bool,
    /// Set when the pin rejected a write
    fault: bool,
}

impl<P: OutputPin> GpioFan<P> {
    /// Create a new fan output, initially off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut fan = Self {
            pin,
            inverted,
            on: false,
            fault: false,
        };
        fan.set_on(false);
        fan
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// True if the last write to the pin failed
    pub fn has_fault(&self) -> bool {
        self.fault
    }
}

impl<P: OutputPin> FanActuator for GpioFan<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;
        // A failed pin write leaves the previous level; retried next tick
        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        self.fault = result.is_err();
    }
}
