//! Config-driven pin bank
//!
//! Buttons and the RGB LED can sit on any free GPIO, so those pins are
//! handed out by number at runtime. The UART, ADC, PWM and PIO pins are
//! bound to their peripherals at compile time and come out of
//! [`PinBank::from_peripherals`] as typed handles.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{ADC, PIN_0, PIN_1, PIN_10, PIN_26, PIN_7, PIO0, PWM_SLICE5, UART0};
use embassy_rp::{Peri, Peripherals};

use crate::gpio::GPIO_COUNT;

/// Console UART TX
pub const UART_TX_PIN: u8 = 0;
/// Console UART RX
pub const UART_RX_PIN: u8 = 1;
/// WS2812 data line (PIO0)
pub const MATRIX_PIN: u8 = 7;
/// Buzzer (PWM slice 5, channel A)
pub const BUZZER_PIN: u8 = 10;
/// Joystick Y axis (ADC0)
pub const JOYSTICK_Y_PIN: u8 = 26;

/// Pins tied to a peripheral; not available from the bank
pub const DEDICATED_PINS: [u8; 5] = [
    UART_TX_PIN,
    UART_RX_PIN,
    MATRIX_PIN,
    BUZZER_PIN,
    JOYSTICK_Y_PIN,
];

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin bound to a dedicated peripheral
    Reserved,
}

/// Peripherals the board wiring fixes in place
pub struct BoardPeripherals {
    pub uart0: Peri<'static, UART0>,
    pub uart_tx: Peri<'static, PIN_0>,
    pub uart_rx: Peri<'static, PIN_1>,
    pub pio0: Peri<'static, PIO0>,
    pub matrix: Peri<'static, PIN_7>,
    pub buzzer_slice: Peri<'static, PWM_SLICE5>,
    pub buzzer: Peri<'static, PIN_10>,
    pub adc: Peri<'static, ADC>,
    pub joystick_y: Peri<'static, PIN_26>,
}

/// General-purpose pins, taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

macro_rules! bank {
    ($p:ident; $($n:literal => $pin:ident),* $(,)?) => {{
        let mut pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT] = Default::default();
        $( pins[$n] = Some($p.$pin.into()); )*
        pins
    }};
}

impl PinBank {
    /// Split the peripherals into the pin bank and the dedicated handles
    pub fn from_peripherals(p: Peripherals) -> (Self, BoardPeripherals) {
        let pins = bank!(p;
            2 => PIN_2, 3 => PIN_3, 4 => PIN_4, 5 => PIN_5, 6 => PIN_6,
            8 => PIN_8, 9 => PIN_9, 11 => PIN_11, 12 => PIN_12, 13 => PIN_13,
            14 => PIN_14, 15 => PIN_15, 16 => PIN_16, 17 => PIN_17, 18 => PIN_18,
            19 => PIN_19, 20 => PIN_20, 21 => PIN_21, 22 => PIN_22, 23 => PIN_23,
            24 => PIN_24, 25 => PIN_25, 27 => PIN_27, 28 => PIN_28, 29 => PIN_29,
        );
        let board = BoardPeripherals {
            uart0: p.UART0,
            uart_tx: p.PIN_0,
            uart_rx: p.PIN_1,
            pio0: p.PIO0,
            matrix: p.PIN_7,
            buzzer_slice: p.PWM_SLICE5,
            buzzer: p.PIN_10,
            adc: p.ADC,
            joystick_y: p.PIN_26,
        };
        (Self { pins }, board)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        check_pin(pin_num)?;
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }

    pub fn is_available(&self, pin_num: u8) -> bool {
        check_pin(pin_num).is_ok() && self.pins[pin_num as usize].is_some()
    }
}

fn check_pin(pin_num: u8) -> Result<(), PinError> {
    if pin_num as usize >= GPIO_COUNT {
        Err(PinError::InvalidPin)
    } else if DEDICATED_PINS.contains(&pin_num) {
        Err(PinError::Reserved)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pin() {
        assert_eq!(check_pin(5), Ok(()));
        assert_eq!(check_pin(10), Err(PinError::Reserved));
        assert_eq!(check_pin(26), Err(PinError::Reserved));
        assert_eq!(check_pin(30), Err(PinError::InvalidPin));
    }
}
