//! RP2040-specific HAL for the interlock firmware
//!
//! Implements the `interlock-hal` traits and the core's analog source on
//! RP2040 peripherals:
//!
//! - GPIO allocation and the config-driven pin bank
//! - Active-high/active-low output wrapper for the RGB LED
//! - ADC channel mapping and the joystick reader
//! - PWM buzzer
//! - PIO WS2812 driver for the 5x5 matrix

#![no_std]

pub mod adc;
pub mod gpio;
pub mod pins;
pub mod pio;
pub mod tone;
pub mod ws2812;

pub use adc::JoystickAdc;
pub use gpio::{GpioAllocator, GpioOutput};
pub use pins::{BoardPeripherals, PinBank, PinError};
pub use tone::PwmBuzzer;
pub use ws2812::Ws2812Matrix;
