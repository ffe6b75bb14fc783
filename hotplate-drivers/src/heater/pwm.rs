//! PWM heater output
//!
//! Drives the heater through an SSR or MOSFET from a PWM channel. The
//! 0..=255 duty from the control loop is scaled onto the channel's range.

use embedded_hal::pwm::SetDutyCycle;
use hotplate_core::traits::HeaterActuator;

/// PWM heater output
///
/// The output can be configured as active-high (default) or active-low.
pub struct PwmHeater<P> {
    pwm: P,
    /// If true, full power = channel at 0%
    inverted: bool,
    /// Last duty requested (0..=255)
    duty: u8,
    /// Set when the channel rejected a write
    fault: bool,
}

impl<P: SetDutyCycle> PwmHeater<P> {
    /// Create a new PWM heater output, initially off
    ///
    /// # Arguments
    /// - `pwm`: The PWM channel driving the heater
    /// - `inverted`: If true, the heater is on while the channel is low
    pub fn new(pwm: P, inverted: bool) -> Self {
        let mut heater = Self {
            pwm,
            inverted,
            duty: 0,
            fault: false,
        };
        heater.set_duty(0);
        heater
    }

    pub fn new_active_high(pwm: P) -> Self {
        Self::new(pwm, false)
    }

    pub fn new_active_low(pwm: P) -> Self {
        Self::new(pwm, true)
    }

    /// Last requested duty
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// True if the last write to the channel failed
    pub fn has_fault(&self) -> bool {
        self.fault
    }
}

impl<P: SetDutyCycle> HeaterActuator for PwmHeater<P> {
    fn set_duty(&mut self, duty: u8) {
        self.duty = duty;
        let level = if self.inverted { u8::MAX - duty } else { duty };
        self.fault = self
            .pwm
            .set_duty_cycle_fraction(level as u16, u8::MAX as u16)
            .is_err();
    }
}
