//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in hotplate-core on top of `embedded-hal` 1.0:
//!
//! - Heater output (PWM into an SSR or MOSFET)
//! - Cooling fan (GPIO)
//! - Thermocouple converter (MAX6675 over SPI)

#![no_std]
#![deny(unsafe_code)]

pub mod fan;
pub mod heater;
pub mod sensor;
