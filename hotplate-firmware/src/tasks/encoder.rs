//! Rotary encoder task
//!
//! Woken by the GPIO interrupt on every clock edge. Steps go straight to
//! the input router, which only touches single atomics, so the control
//! task never waits on the encoder.

use defmt::*;
use embassy_rp::gpio::Input;

use hotplate_core::input::{EncoderDecoder, InputRouter};

/// Encoder rotation task
#[embassy_executor::task]
pub async fn encoder_task(mut clk: Input<'static>, dt: Input<'static>, router: InputRouter<'static>) {
    info!("Encoder task started");

    let mut decoder = EncoderDecoder::new(clk.is_high());

    loop {
        clk.wait_for_any_edge().await;

        if let Some(step) = decoder.on_transition(clk.is_high(), dt.is_high()) {
            router.on_step(step);
            trace!("Encoder: {}", step.direction);
        }
    }
}
