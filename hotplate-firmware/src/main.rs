//! Hotplate - Reflow Soldering Hotplate Firmware
//!
//! Main firmware binary for RP2040-based hotplates. All control decisions
//! live in `hotplate-core`; this crate wires the board's pins to it and
//! runs the tasks.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use {defmt_rtt as _, panic_probe as _};

use hotplate_core::profile::ProfileStore;
use hotplate_core::Controller;
use hotplate_drivers::fan::GpioFan;
use hotplate_drivers::heater::PwmHeater;
use hotplate_drivers::sensor::Max6675;

use crate::channels::SHARED;
use crate::display::SignalDisplay;

mod channels;
mod config;
mod display;
mod tasks;

/// SSR-friendly PWM: 125 MHz / 255 / 65536 is about 7.5 Hz
const PWM_DIVIDER: u8 = 255;
const PWM_TOP: u16 = u16::MAX;

/// MAX6675 clock limit is 4.3 MHz
const SPI_FREQUENCY_HZ: u32 = 1_000_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Hotplate firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let control_config = config::control_config();
    let store = match ProfileStore::new(&config::PRESETS) {
        Ok(store) => store,
        Err(e) => {
            // build.rs rejects bad tables, so this only happens if the two
            // validators drift apart
            error!("Board presets rejected ({}), using built-in presets", e);
            ProfileStore::default()
        }
    };
    info!("{} presets loaded", store.len());

    // Heater SSR on GPIO14 (PWM slice 7, channel A)
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = PWM_DIVIDER.into();
    pwm_config.top = PWM_TOP;
    pwm_config.compare_a = 0;
    let pwm = Pwm::new_output_a(p.PWM_SLICE7, p.PIN_14, pwm_config);
    let (heater_channel, _) = pwm.split();
    let heater = PwmHeater::new(unwrap!(heater_channel), config::HEATER_ACTIVE_LOW);

    // Cooling fan on GPIO15
    let fan = GpioFan::new(Output::new(p.PIN_15, Level::Low), config::FAN_ACTIVE_LOW);
    info!("Heater and fan outputs initialized (off)");

    // MAX6675 on SPI0: SCK=GPIO18, SO=GPIO16, CS=GPIO17
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_rxonly(p.SPI0, p.PIN_18, p.PIN_16, spi_config);
    let thermocouple = Max6675::new(spi, Output::new(p.PIN_17, Level::High));
    info!("Thermocouple initialized");

    // Encoder: CLK=GPIO10, DT=GPIO11, SW=GPIO12, all pulled up
    let clk = Input::new(p.PIN_10, Pull::Up);
    let dt = Input::new(p.PIN_11, Pull::Up);
    let button = Input::new(p.PIN_12, Pull::Up);

    let controller = Controller::new(
        &SHARED,
        store,
        control_config,
        &SHARED.temperature,
        heater,
        fan,
        SignalDisplay,
    );
    let router = controller.router();
    info!("Controller initialized");

    // Spawn tasks
    spawner
        .spawn(tasks::sensor_task(thermocouple, control_config.tick_period_ms))
        .unwrap();
    spawner.spawn(tasks::encoder_task(clk, dt, router)).unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();
    spawner.spawn(tasks::display_task()).unwrap();
    spawner.spawn(tasks::control_task(controller)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
