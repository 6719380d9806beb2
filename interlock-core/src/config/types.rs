//! Configuration type definitions
//!
//! Defaults reproduce the stock board wiring and factory passwords.

use heapless::String;

use crate::access::{Credentials, Password};
use crate::input::DEFAULT_DEBOUNCE_MS;
use crate::waiter::DEFAULT_POLL_INTERVAL_MS;

/// Delay between power-up and the banner
pub const DEFAULT_BOOT_DELAY_MS: u32 = 10_000;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO number (0-29 on the RP2040)
    pub pin: u8,
    /// Active-low
    pub inverted: bool,
    /// Internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Active-low button with pull-up
    pub const fn button(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Stored passwords
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PasswordConfig {
    pub admin: Password,
    pub machine_a: Password,
    pub machine_b: Password,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            admin: fixed("admin123"),
            machine_a: fixed("1234"),
            machine_b: fixed("5678"),
        }
    }
}

// Only used with literals that fit
fn fixed(s: &str) -> Password {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Timing knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Minimum spacing between accepted presses on one input
    pub debounce_ms: u32,
    /// Sleep between condition polls
    pub poll_interval_ms: u32,
    /// Startup delay before the console comes up
    pub boot_delay_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
        }
    }
}

/// Board wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignments {
    pub button_a: PinConfig,
    pub button_b: PinConfig,
    pub joystick_button: PinConfig,
    /// Must be an ADC-capable pin (26-29)
    pub joystick_y: PinConfig,
    pub buzzer: PinConfig,
    pub led_red: PinConfig,
    pub led_green: PinConfig,
    pub led_blue: PinConfig,
    /// WS2812 data line
    pub matrix: PinConfig,
}

impl Default for PinAssignments {
    fn default() -> Self {
        Self {
            button_a: PinConfig::button(5),
            button_b: PinConfig::button(6),
            joystick_button: PinConfig::button(22),
            joystick_y: PinConfig::new(26),
            buzzer: PinConfig::new(10),
            led_red: PinConfig::new(13),
            led_green: PinConfig::new(11),
            led_blue: PinConfig::new(12),
            matrix: PinConfig::new(7),
        }
    }
}

impl PinAssignments {
    /// All assigned GPIO numbers, for conflict checks
    pub fn all(&self) -> [u8; 9] {
        [
            self.button_a.pin,
            self.button_b.pin,
            self.joystick_button.pin,
            self.joystick_y.pin,
            self.buzzer.pin,
            self.led_red.pin,
            self.led_green.pin,
            self.led_blue.pin,
            self.matrix.pin,
        ]
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterlockConfig {
    pub passwords: PasswordConfig,
    pub timing: TimingConfig,
    pub pins: PinAssignments,
}

impl InterlockConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::from_passwords(
            self.passwords.admin.clone(),
            self.passwords.machine_a.clone(),
            self.passwords.machine_b.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::MachineId;

    #[test]
    fn test_default_credentials() {
        let creds = InterlockConfig::default().credentials();
        assert!(creds.matches_admin("admin123"));
        assert!(creds.matches_machine(MachineId::A, "1234"));
        assert!(creds.matches_machine(MachineId::B, "5678"));
    }

    #[test]
    fn test_default_pins_unique() {
        let pins = PinAssignments::default().all();
        for (i, a) in pins.iter().enumerate() {
            assert!(!pins[i + 1..].contains(a), "gpio{} assigned twice", a);
        }
    }
}
