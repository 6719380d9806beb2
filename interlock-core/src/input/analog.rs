//! Analog threshold source
//!
//! Single-sample reads; no smoothing or averaging.

use crate::error::InterlockError;

/// Full-scale reading of the 12-bit ADC
pub const ADC_MAX: u16 = 4095;

/// Logical analog channel identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    /// Joystick vertical axis
    JoystickY,
}

impl AnalogChannel {
    pub fn label(self) -> &'static str {
        match self {
            AnalogChannel::JoystickY => "joystick Y",
        }
    }
}

/// One reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogSample {
    pub channel: AnalogChannel,
    /// Raw value in `0..=ADC_MAX`
    pub value: u16,
}

/// Source of analog samples
pub trait AnalogSource {
    /// Non-blocking single-sample read
    fn read(&mut self, channel: AnalogChannel) -> Result<u16, InterlockError>;

    fn sample(&mut self, channel: AnalogChannel) -> Result<AnalogSample, InterlockError> {
        Ok(AnalogSample {
            channel,
            value: self.read(channel)?.min(ADC_MAX),
        })
    }
}

impl<T: AnalogSource + ?Sized> AnalogSource for &mut T {
    fn read(&mut self, channel: AnalogChannel) -> Result<u16, InterlockError> {
        (**self).read(channel)
    }
}

/// How a sample is compared against a step threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Comparator {
    /// `value >= threshold` (push to the top of the range)
    AtLeast,
    /// `value < threshold` (pull to the bottom of the range)
    Below,
}

impl Comparator {
    pub const fn holds(self, value: u16, threshold: u16) -> bool {
        match self {
            Comparator::AtLeast => value >= threshold,
            Comparator::Below => value < threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::AtLeast => ">=",
            Comparator::Below => "<",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_comparator_boundaries() {
        assert!(Comparator::AtLeast.holds(4070, 4070));
        assert!(!Comparator::AtLeast.holds(4069, 4070));
        assert!(Comparator::Below.holds(19, 20));
        assert!(!Comparator::Below.holds(20, 20));
    }

    struct Fixed(u16);

    impl AnalogSource for Fixed {
        fn read(&mut self, _channel: AnalogChannel) -> Result<u16, InterlockError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_sample_clamps_to_adc_range() {
        let mut src = Fixed(5000);
        let s = src.sample(AnalogChannel::JoystickY).unwrap();
        assert_eq!(s.value, ADC_MAX);
    }

    proptest! {
        #[test]
        fn prop_comparators_partition(value in 0u16..=ADC_MAX, threshold in 0u16..=ADC_MAX) {
            // For the same threshold exactly one of the two holds
            prop_assert_ne!(
                Comparator::AtLeast.holds(value, threshold),
                Comparator::Below.holds(value, threshold)
            );
        }
    }
}
