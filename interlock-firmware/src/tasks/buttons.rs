//! Button edge monitor
//!
//! One task per panel input. The task mirrors the raw level into the
//! shared [`InputBank`](interlock_core::input::InputBank) and offers every
//! press edge to the debouncer.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use interlock_core::input::InputId;

use crate::INPUTS;

#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(id: InputId, mut pin: Input<'static>, active_low: bool) {
    info!("Button task started: {}", id);

    let is_pressed = |pin: &Input<'static>| pin.is_low() == active_low;
    INPUTS.set_level(id, is_pressed(&pin));

    loop {
        pin.wait_for_any_edge().await;
        let now_us = Instant::now().as_micros();
        let pressed = is_pressed(&pin);
        INPUTS.set_level(id, pressed);

        if !pressed {
            continue;
        }
        match INPUTS.on_edge(id, now_us) {
            Ok(press) => debug!("{} pressed at {}us", id, press.at_us),
            Err(_) => trace!("{} bounce ignored", id),
        }
    }
}
