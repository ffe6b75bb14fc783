//! Thermocouple sampling task
//!
//! Reads the MAX6675 once per control tick and publishes the result to the
//! shared temperature cell. Read failures publish the fault sentinel so
//! the control loop's sensor guard cuts the heater.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Duration, Ticker};

use hotplate_core::traits::{TemperatureSensor, SENSOR_FAULT_SENTINEL_C};
use hotplate_drivers::sensor::max6675::{Max6675, CONVERSION_TIME_MS};

use crate::channels::SHARED;

/// The board's thermocouple converter
pub type Thermocouple = Max6675<Spi<'static, SPI0, Blocking>, Output<'static>>;

/// Thermocouple sampling task
#[embassy_executor::task]
pub async fn sensor_task(mut sensor: Thermocouple, period_ms: u32) {
    info!("Sensor task started");

    // Never poll faster than the converter finishes
    let period = period_ms.max(CONVERSION_TIME_MS);
    let mut ticker = Ticker::every(Duration::from_millis(period as u64));
    let mut faulted = false;

    loop {
        match sensor.read_celsius() {
            Ok(celsius) => {
                if faulted {
                    info!("Thermocouple recovered: {} C", celsius);
                    faulted = false;
                }
                SHARED.temperature.store(celsius);
            }
            Err(e) => {
                if !faulted {
                    warn!("Thermocouple read failed: {}", e);
                    faulted = true;
                }
                SHARED.temperature.store(SENSOR_FAULT_SENTINEL_C);
            }
        }

        ticker.next().await;
    }
}
