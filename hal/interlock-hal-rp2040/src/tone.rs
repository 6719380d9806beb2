//! PWM buzzer
//!
//! The slice runs from the system clock through a fixed divider of 20; the
//! wrap value picks the frequency and the compare level sits at half of it.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::types::U12F4;
use interlock_hal::ToneOutput;

use crate::pio::SYS_CLK_HZ;

/// PWM clock divider used for every tone
pub const BUZZER_CLOCK_DIVIDER: u32 = 20;

/// Wrap and compare values for a tone, `None` for silence
///
/// Frequencies too low for a 16-bit wrap clamp to the lowest reachable
/// pitch.
pub fn tone_levels(freq_hz: u32) -> Option<(u16, u16)> {
    if freq_hz == 0 {
        return None;
    }
    let ticks = SYS_CLK_HZ / freq_hz.saturating_mul(BUZZER_CLOCK_DIVIDER).max(1);
    let top = ticks.saturating_sub(1).clamp(1, u16::MAX as u32) as u16;
    Some((top, top / 2))
}

/// Buzzer on PWM channel A
pub struct PwmBuzzer {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmBuzzer {
    /// Wrap a PWM output; starts silent
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.divider = U12F4::from_num(BUZZER_CLOCK_DIVIDER);
        config.compare_a = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl ToneOutput for PwmBuzzer {
    fn start(&mut self, freq_hz: u32) {
        match tone_levels(freq_hz) {
            Some((top, compare)) => {
                self.config.top = top;
                self.config.compare_a = compare;
                self.pwm.set_config(&self.config);
            }
            None => self.silence(),
        }
    }

    fn silence(&mut self) {
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_levels() {
        // 125 MHz / (1000 Hz * 20) = 6250 ticks
        assert_eq!(tone_levels(1000), Some((6249, 3124)));
        assert_eq!(tone_levels(200), Some((31249, 15624)));
        assert_eq!(tone_levels(0), None);
    }

    #[test]
    fn test_low_tones_clamp() {
        let (top, _) = tone_levels(10).unwrap();
        assert_eq!(top, u16::MAX);
    }
}
