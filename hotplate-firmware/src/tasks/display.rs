//! Display task
//!
//! Waits on the display signals and renders each frame. This board has no
//! panel driver yet, so frames are rendered to the defmt log.

use defmt::*;
use embassy_futures::select::{select3, Either3};

use hotplate_core::traits::FieldValue;

use crate::channels::{CURVE, SELECTION, STATUS};

/// Display rendering task
#[embassy_executor::task]
pub async fn display_task() {
    info!("Display task started");

    loop {
        match select3(STATUS.wait(), SELECTION.wait(), CURVE.wait()).await {
            Either3::First(status) => {
                trace!(
                    "[{}] {} t={}s target={} C plate={} C duty={} fan={}",
                    status.mode.label(),
                    status.phase.label(),
                    status.elapsed_s,
                    status.target_c,
                    status.measured_c,
                    status.duty,
                    status.fan_on
                );
            }
            Either3::Second(selection) => {
                let marker = if selection.editing { "*" } else { ">" };
                match selection.value {
                    FieldValue::Number(value) => {
                        debug!("{} {}: {}", marker, selection.label, value)
                    }
                    FieldValue::Preset { index, name } => {
                        debug!("{} {}: {} ({})", marker, selection.label, name, index)
                    }
                    FieldValue::Toggle { running } => {
                        let state = if running { "stop" } else { "start" };
                        debug!("{} {}: {}", marker, selection.label, state)
                    }
                }
            }
            Either3::Third((profile, name)) => {
                info!("Curve: {}", name);
                for point in profile.checkpoints.iter() {
                    debug!("  {} C at {} s", point.temp_c, point.time_s);
                }
            }
        }
    }
}
