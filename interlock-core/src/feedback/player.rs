//! Cue playback
//!
//! Executes [`CueStep`] sequences on the indicator LED, the buzzer and the
//! LED matrix. Playback blocks the caller for the cue's length, so it runs
//! in its own task on the firmware.

use embedded_hal_async::delay::DelayNs;
use interlock_hal::{PixelMatrix, Rgb, ToneOutput, MATRIX_PIXELS};

use super::cue::{CueStep, Frame, LedColor};
use super::indicator::Indicator;

/// Sweep timing
const SWEEP_PIXEL_MS: u32 = 50;
const SWEEP_SETTLE_MS: u32 = 200;
const SWEEP_PULSE_MS: u32 = 200;
const SWEEP_PULSES: usize = 2;
const SWEEP_TAIL_MS: u32 = 500;

pub struct EffectsPlayer<L, T, M, D> {
    indicator: L,
    tone: T,
    matrix: M,
    delay: D,
}

impl<L, T, M, D> EffectsPlayer<L, T, M, D>
where
    L: Indicator,
    T: ToneOutput,
    M: PixelMatrix,
    D: DelayNs,
{
    pub fn new(indicator: L, tone: T, matrix: M, delay: D) -> Self {
        Self {
            indicator,
            tone,
            matrix,
            delay,
        }
    }

    /// Set the indicator without any timing
    pub fn set_led(&mut self, color: LedColor) {
        self.indicator.show(color);
    }

    /// Silence the buzzer and blank the matrix and indicator
    pub async fn reset(&mut self) {
        self.tone.silence();
        self.indicator.show(LedColor::Off);
        self.matrix.clear().await;
    }

    /// Play a cue to completion
    pub async fn play(&mut self, cue: &[CueStep]) {
        for step in cue {
            match *step {
                CueStep::Led(color) => self.indicator.show(color),
                CueStep::Tone {
                    freq_hz,
                    duration_ms,
                } => {
                    self.tone.start(freq_hz);
                    self.delay.delay_ms(duration_ms).await;
                    self.tone.silence();
                }
                CueStep::Pause(ms) => self.delay.delay_ms(ms).await,
                CueStep::Frames {
                    frames,
                    color,
                    frame_ms,
                    hold_ms,
                } => self.frames(frames, color, frame_ms, hold_ms).await,
                CueStep::Sweep(color) => self.sweep(color).await,
            }
        }
    }

    async fn frames(&mut self, frames: &[Frame], color: Rgb, frame_ms: u32, hold_ms: u32) {
        for frame in frames {
            self.matrix.write(&paint(frame, color)).await;
            self.delay.delay_ms(frame_ms).await;
        }
        if let Some(last) = frames.last() {
            self.matrix.write(&paint(last, color)).await;
            self.delay.delay_ms(hold_ms).await;
        }
        self.matrix.clear().await;
    }

    async fn sweep(&mut self, color: Rgb) {
        let mut strip = [Rgb::OFF; MATRIX_PIXELS];

        for i in 0..MATRIX_PIXELS {
            strip[i] = color;
            self.matrix.write(&strip).await;
            self.delay.delay_ms(SWEEP_PIXEL_MS).await;
        }
        self.delay.delay_ms(SWEEP_SETTLE_MS).await;

        for _ in 0..SWEEP_PULSES {
            self.matrix.write(&[color; MATRIX_PIXELS]).await;
            self.delay.delay_ms(SWEEP_PULSE_MS).await;
            self.matrix.clear().await;
            self.delay.delay_ms(SWEEP_PULSE_MS).await;
        }

        strip = [color; MATRIX_PIXELS];
        self.matrix.write(&strip).await;
        self.delay.delay_ms(SWEEP_SETTLE_MS).await;

        for i in (0..MATRIX_PIXELS).rev() {
            strip[i] = Rgb::OFF;
            self.matrix.write(&strip).await;
            self.delay.delay_ms(SWEEP_PIXEL_MS).await;
        }
        self.delay.delay_ms(SWEEP_TAIL_MS).await;
        self.matrix.clear().await;
    }
}

fn paint(frame: &Frame, color: Rgb) -> [Rgb; MATRIX_PIXELS] {
    let mut pixels = [Rgb::OFF; MATRIX_PIXELS];
    for (pixel, &on) in pixels.iter_mut().zip(frame.iter()) {
        if on {
            *pixel = color;
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::feedback::cue::{
        CROSS_FRAMES, DIM_RED, LOCKOUT_ENTERED, PASSWORD_DENIED, PRESS_COUNTED, SWEEP_RED,
    };
    use crate::testing::{SimClock, SimDelay};
    use embassy_futures::block_on;
    use std::cell::RefCell;
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Led(LedColor),
        Tone(u32),
        Silence,
        Write([Rgb; MATRIX_PIXELS]),
    }

    struct Log<'a>(&'a RefCell<Vec<(u64, Op)>>, &'a SimClock);

    impl Log<'_> {
        fn push(&self, op: Op) {
            self.0.borrow_mut().push((self.1.now_ms(), op));
        }
    }

    impl Indicator for Log<'_> {
        fn show(&mut self, color: LedColor) {
            self.push(Op::Led(color));
        }
    }

    impl ToneOutput for Log<'_> {
        fn start(&mut self, freq_hz: u32) {
            self.push(Op::Tone(freq_hz));
        }

        fn silence(&mut self) {
            self.push(Op::Silence);
        }
    }

    impl PixelMatrix for Log<'_> {
        async fn write(&mut self, pixels: &[Rgb; MATRIX_PIXELS]) {
            self.push(Op::Write(*pixels));
        }
    }

    fn play(cue: &[CueStep]) -> (Vec<(u64, Op)>, u64) {
        let clock = SimClock::new();
        let log = RefCell::new(Vec::new());
        let mut player = EffectsPlayer::new(
            Log(&log, &clock),
            Log(&log, &clock),
            Log(&log, &clock),
            SimDelay::new(&clock),
        );
        block_on(player.play(cue));
        (log.into_inner(), clock.now_ms())
    }

    #[test]
    fn test_press_counted_timeline() {
        let (ops, total) = play(PRESS_COUNTED);
        assert_eq!(
            ops,
            [
                (0, Op::Tone(1_000)),
                (100, Op::Silence),
                (100, Op::Led(LedColor::Green)),
                (300, Op::Led(LedColor::Off)),
            ]
        );
        assert_eq!(total, 300);
    }

    #[test]
    fn test_password_denied_draws_cross() {
        let (ops, total) = play(PASSWORD_DENIED);
        // 1 s tone, three 150 ms frames, 1 s hold
        assert_eq!(total, 1_000 + 3 * 150 + 1_000);

        let writes: Vec<_> = ops
            .iter()
            .filter_map(|(_, op)| match op {
                Op::Write(px) => Some(*px),
                _ => None,
            })
            .collect();
        // 3 frames, the held last frame, then clear
        assert_eq!(writes.len(), 5);
        assert_eq!(writes[2], paint(&CROSS_FRAMES[2], DIM_RED));
        assert_eq!(writes[3], writes[2]);
        assert_eq!(writes[4], [Rgb::OFF; MATRIX_PIXELS]);
        assert_eq!(writes[0][0], DIM_RED);
        assert_eq!(writes[0][1], Rgb::OFF);
    }

    #[test]
    fn test_sweep_duration_and_end_state() {
        let (ops, total) = play(LOCKOUT_ENTERED);
        let sweep = 25 * 50 + 200 + 2 * 400 + 200 + 25 * 50 + 500;
        assert_eq!(total, 2_000 + sweep);

        let last = ops.last().map(|(_, op)| op.clone());
        assert_eq!(last, Some(Op::Write([Rgb::OFF; MATRIX_PIXELS])));

        // Fully lit before the reverse wipe
        assert!(ops
            .iter()
            .any(|(_, op)| *op == Op::Write([SWEEP_RED; MATRIX_PIXELS])));
    }
}
