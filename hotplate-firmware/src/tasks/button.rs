//! Encoder push-button task

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Timer};

use crate::channels::SHARED;

/// Contact bounce settle time
const DEBOUNCE_MS: u64 = 20;

/// Button press task
///
/// Latches one press per falling edge; the control task consumes it on its
/// next pass. Presses that arrive before then collapse into one.
#[embassy_executor::task]
pub async fn button_task(mut btn: Input<'static>) {
    info!("Button task started");

    loop {
        btn.wait_for_falling_edge().await;
        SHARED.selection.latch_press();
        debug!("Button: press");

        // Ignore bounce on both the press and the release
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
        btn.wait_for_high().await;
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
    }
}
