//! Feedback effects task
//!
//! Turns feedback events into LED, buzzer and matrix output. Cues play to
//! completion one after another; a blink keeps toggling the LED between
//! events until the next cue or stop.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::peripherals::PIO0;
use embassy_time::{Delay, Timer};

use interlock_core::feedback::{Effect, EffectMapper, EffectsPlayer, LedColor, RgbIndicator};
use interlock_hal_rp2040::{GpioOutput, PwmBuzzer, Ws2812Matrix};

use crate::channels::FEEDBACK_CHANNEL;

/// Half period of the hold blink
const BLINK_INTERVAL_MS: u64 = 100;

pub type StatusLed = RgbIndicator<GpioOutput, GpioOutput, GpioOutput>;

#[embassy_executor::task]
pub async fn effects_task(led: StatusLed, buzzer: PwmBuzzer, matrix: Ws2812Matrix<'static, PIO0, 0>) {
    info!("Effects task started");

    let mut player = EffectsPlayer::new(led, buzzer, matrix, Delay);
    player.reset().await;

    let mut mapper = EffectMapper::new();
    // Blink colour and whether the LED is lit right now
    let mut blink: Option<(LedColor, bool)> = None;

    loop {
        let event = match blink {
            None => FEEDBACK_CHANNEL.receive().await,
            Some((color, lit)) => {
                match select(
                    FEEDBACK_CHANNEL.receive(),
                    Timer::after_millis(BLINK_INTERVAL_MS),
                )
                .await
                {
                    Either::First(event) => event,
                    Either::Second(()) => {
                        player.set_led(if lit { LedColor::Off } else { color });
                        blink = Some((color, !lit));
                        continue;
                    }
                }
            }
        };

        match mapper.effect_for(&event) {
            Effect::Play(cue) => {
                blink = None;
                trace!("Playing cue for {}", event);
                player.play(cue).await;
            }
            Effect::Blink(color) => {
                player.set_led(color);
                blink = Some((color, true));
            }
            Effect::StopBlink => {
                blink = None;
                player.set_led(LedColor::Off);
            }
            Effect::Nothing => {}
        }
    }
}
