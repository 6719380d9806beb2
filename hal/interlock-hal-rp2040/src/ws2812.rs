//! WS2812 5x5 matrix on a PIO state machine
//!
//! Classic side-set program: each bit is 10 PIO cycles, high for 3 (zero)
//! or 8 (one) of them. Pixels are pushed as 24-bit GRB words, MSB first.

use embassy_rp::pio::{
    Common, Config, Direction, FifoJoin, Instance, PioPin, ShiftConfig, ShiftDirection,
    StateMachine,
};
use embassy_rp::Peri;
use embassy_time::Timer;
use fixed::types::U24F8;
use interlock_hal::{PixelMatrix, Rgb, MATRIX_PIXELS};

use crate::pio::clock_divider_bits;

/// WS2812 data rate
pub const BIT_RATE_HZ: u32 = 800_000;
const CYCLES_PER_BIT: u32 = 10;
/// Line idle time that latches a frame
const RESET_US: u64 = 60;

pub struct Ws2812Matrix<'d, P: Instance, const S: usize> {
    sm: StateMachine<'d, P, S>,
}

impl<'d, P: Instance, const S: usize> Ws2812Matrix<'d, P, S> {
    pub fn new(
        common: &mut Common<'d, P>,
        mut sm: StateMachine<'d, P, S>,
        pin: Peri<'d, impl PioPin>,
    ) -> Self {
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "    out x, 1        side 0 [2]",
            "    jmp !x do_zero  side 1 [1]",
            "    jmp bitloop     side 1 [4]",
            "do_zero:",
            "    nop             side 0 [4]",
            ".wrap"
        );
        let installed = common.load_program(&prg.program);
        let out_pin = common.make_pio_pin(pin);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&out_pin]);
        cfg.clock_divider = U24F8::from_bits(clock_divider_bits(BIT_RATE_HZ * CYCLES_PER_BIT));
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 24,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_pin_dirs(Direction::Out, &[&out_pin]);
        sm.set_enable(true);

        Self { sm }
    }
}

impl<P: Instance, const S: usize> PixelMatrix for Ws2812Matrix<'_, P, S> {
    async fn write(&mut self, pixels: &[Rgb; MATRIX_PIXELS]) {
        for pixel in pixels {
            self.sm.tx().wait_push(pixel.to_grb() << 8).await;
        }
        Timer::after_micros(RESET_US).await;
    }
}
