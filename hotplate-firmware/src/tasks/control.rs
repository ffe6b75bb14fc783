//! Control task
//!
//! Runs the controller's main loop: consumes button presses, pushes display
//! updates and fires the control tick once per tick period. Logs what each
//! pass did.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Instant, Ticker};

use hotplate_core::input::ButtonOutcome;
use hotplate_core::shared::TemperatureCell;
use hotplate_core::state::ModeEvent;
use hotplate_core::{Controller, TickReport};
use hotplate_drivers::fan::GpioFan;
use hotplate_drivers::heater::PwmHeater;

use crate::display::SignalDisplay;

/// How often the main loop polls for input and tick deadlines
const POLL_INTERVAL_MS: u64 = 10;

/// The board's controller
pub type HotplateController = Controller<
    'static,
    &'static TemperatureCell,
    PwmHeater<PwmOutput<'static>>,
    GpioFan<Output<'static>>,
    SignalDisplay,
>;

/// Control loop task
#[embassy_executor::task]
pub async fn control_task(mut controller: HotplateController) {
    info!("Control task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let mut sensor_faulted = false;
    let mut output_faulted = false;

    loop {
        // Wraps after ~49 days; the controller handles it
        let now_ms = Instant::now().as_millis() as u32;
        let report = controller.poll(now_ms);

        if let Some(outcome) = report.button {
            log_button(outcome);
        }

        if let Some(tick) = report.tick {
            if tick.status.sensor_fault != sensor_faulted {
                sensor_faulted = tick.status.sensor_fault;
                if sensor_faulted {
                    warn!("Sensor fault: heater forced off");
                } else {
                    info!("Sensor reading valid again");
                }
            }
            log_tick(&tick);

            let faulted = controller.heater().has_fault() || controller.fan().has_fault();
            if faulted != output_faulted {
                output_faulted = faulted;
                if faulted {
                    error!(
                        "Output write failed (heater: {}, fan: {})",
                        controller.heater().has_fault(),
                        controller.fan().has_fault()
                    );
                } else {
                    info!("Outputs writable again");
                }
            }
        }

        ticker.next().await;
    }
}

fn log_button(outcome: ButtonOutcome) {
    match outcome {
        ButtonOutcome::EditStarted(field) => debug!("Editing {}", field),
        ButtonOutcome::EditFinished { field, changed } => {
            debug!("Edit of {} done (changed: {})", field, changed)
        }
        ButtonOutcome::EditReverted { field, error } => {
            warn!("Edit of {} reverted: {}", field, error)
        }
        ButtonOutcome::PresetLoaded { index, changed } => {
            info!("Preset {} loaded (changed: {})", index, changed)
        }
        ButtonOutcome::Mode(Some(event)) => log_event(event),
        ButtonOutcome::Mode(None) => {}
        ButtonOutcome::ModeRejected(error) => warn!("Mode request rejected: {}", error),
    }
}

fn log_event(event: ModeEvent) {
    match event {
        ModeEvent::Started(mode) => info!("{} started", mode.label()),
        ModeEvent::Stopped(mode) => info!("{} stopped", mode.label()),
        ModeEvent::Finished(mode) => info!("{} finished", mode.label()),
        ModeEvent::PhaseChanged(phase) => debug!("Phase: {}", phase.label()),
    }
}

fn log_tick(tick: &TickReport) {
    if let Some(event) = tick.event {
        log_event(event);
    }

    let status = &tick.status;
    trace!(
        "tick: t={} target={} plate={} duty={}",
        status.elapsed_s,
        status.target_c,
        status.measured_c,
        status.duty
    );
}
