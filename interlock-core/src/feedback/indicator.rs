//! RGB indicator LED

use interlock_hal::OutputPin;

use super::cue::LedColor;

/// Anything that can show an indicator colour
pub trait Indicator {
    fn show(&mut self, color: LedColor);
}

/// Three discrete GPIO outputs driving a common-cathode RGB LED
pub struct RgbIndicator<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> RgbIndicator<R, G, B> {
    /// Create the indicator, starting dark
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut indicator = Self { red, green, blue };
        indicator.show(LedColor::Off);
        indicator
    }

    /// Colour currently shown, read back from the pins
    pub fn current(&self) -> (bool, bool, bool) {
        (
            self.red.is_set_high(),
            self.green.is_set_high(),
            self.blue.is_set_high(),
        )
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> Indicator for RgbIndicator<R, G, B> {
    fn show(&mut self, color: LedColor) {
        let (r, g, b) = color.channels();
        self.red.set_state(r);
        self.green.set_state(g);
        self.blue.set_state(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pin(bool);

    impl OutputPin for Pin {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }

        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_colors_map_to_pins() {
        let mut led = RgbIndicator::new(Pin(true), Pin(true), Pin(true));
        assert_eq!(led.current(), (false, false, false));

        led.show(LedColor::Red);
        assert_eq!(led.current(), (true, false, false));
        led.show(LedColor::Green);
        assert_eq!(led.current(), (false, true, false));
        led.show(LedColor::Blue);
        assert_eq!(led.current(), (false, false, true));
        led.show(LedColor::Off);
        assert_eq!(led.current(), (false, false, false));
    }
}
