//! ADC channel mapping and the joystick reader
//!
//! RP2040 ADC inputs:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29

use embassy_rp::adc::{Adc, Blocking, Channel};
use interlock_core::input::{AnalogChannel, AnalogSource, ADC_MAX};
use interlock_core::InterlockError;

/// ADC input identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    Adc0,
    Adc1,
    Adc2,
    Adc3,
}

impl AdcChannel {
    pub fn gpio(&self) -> u8 {
        match self {
            AdcChannel::Adc0 => 26,
            AdcChannel::Adc1 => 27,
            AdcChannel::Adc2 => 28,
            AdcChannel::Adc3 => 29,
        }
    }

    pub fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            26 => Some(AdcChannel::Adc0),
            27 => Some(AdcChannel::Adc1),
            28 => Some(AdcChannel::Adc2),
            29 => Some(AdcChannel::Adc3),
            _ => None,
        }
    }
}

/// Joystick Y axis on a blocking ADC
///
/// A single conversion takes about 2 us, so the read is done inline
/// instead of through the ADC interrupt.
pub struct JoystickAdc {
    adc: Adc<'static, Blocking>,
    y_axis: Channel<'static>,
}

impl JoystickAdc {
    pub fn new(adc: Adc<'static, Blocking>, y_axis: Channel<'static>) -> Self {
        Self { adc, y_axis }
    }
}

impl AnalogSource for JoystickAdc {
    fn read(&mut self, channel: AnalogChannel) -> Result<u16, InterlockError> {
        match channel {
            AnalogChannel::JoystickY => self
                .adc
                .blocking_read(&mut self.y_axis)
                .map(|v| v.min(ADC_MAX))
                .map_err(|_| InterlockError::AnalogFault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_mapping_round_trips() {
        for ch in [
            AdcChannel::Adc0,
            AdcChannel::Adc1,
            AdcChannel::Adc2,
            AdcChannel::Adc3,
        ] {
            assert_eq!(AdcChannel::from_gpio(ch.gpio()), Some(ch));
        }
        assert_eq!(AdcChannel::from_gpio(25), None);
    }
}
