//! Heater, fan and temperature sensor traits

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Thermocouple disconnected (open circuit)
    OpenCircuit,
    /// Bus transfer to the converter failed
    Bus,
    /// Reading out of expected range
    OutOfRange,
}

/// Value stored in place of a reading when the sensor reports an error
///
/// Any value above the guard's fault threshold works; this one is well
/// clear of it.
pub const SENSOR_FAULT_SENTINEL_C: f32 = 999.0;

/// Hardware temperature sensor
///
/// Implemented by converter drivers. A conversion may take time, so the
/// firmware polls it on its own cadence and caches the result.
pub trait TemperatureSensor {
    /// Perform a conversion and return degrees Celsius
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

/// Latest cached temperature
///
/// Never blocks. Readings above the fault threshold are treated as a sensor
/// fault by the controller.
pub trait TemperatureSource {
    fn read(&mut self) -> f32;
}

/// Heater power output
pub trait HeaterActuator {
    /// Set the heater duty, 0 (off) to 255 (full power)
    fn set_duty(&mut self, duty: u8);
}

/// Cooling fan output
pub trait FanActuator {
    fn set_on(&mut self, on: bool);
}
