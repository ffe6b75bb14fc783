//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic and the
//! board-specific implementations.

pub mod display;
pub mod heater;

pub use display::{DisplaySink, FieldValue, SelectionView, StatusFrame};
pub use heater::{
    FanActuator, HeaterActuator, SensorError, TemperatureSensor, TemperatureSource,
    SENSOR_FAULT_SENTINEL_C,
};
