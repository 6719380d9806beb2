//! Configuration loading
//!
//! Parses the embedded `interlock.toml`, falling back to the built-in
//! defaults if it is broken, and checks the pin map against the board.

use defmt::*;

use interlock_core::config::{parse_config, InterlockConfig, PinAssignments};
use interlock_hal_rp2040::pins::{BUZZER_PIN, JOYSTICK_Y_PIN, MATRIX_PIN};
use interlock_hal_rp2040::GpioAllocator;

/// Parse the embedded config or fall back to defaults
pub fn load(source: &str) -> InterlockConfig {
    let mut config = match parse_config(source) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs validates the file, so this only happens with a
            // config the host validator accepts but the parser does not
            error!("Failed to parse embedded config: {}", e);
            error!("Using built-in defaults");
            InterlockConfig::default()
        }
    };

    if !pins_valid(&config.pins) {
        error!("Pin map rejected, using default pins");
        config.pins = PinAssignments::default();
    }

    info!(
        "Timing: debounce={}ms poll={}ms boot_delay={}ms",
        config.timing.debounce_ms, config.timing.poll_interval_ms, config.timing.boot_delay_ms
    );
    config
}

/// Every general pin distinct and free, dedicated pins where the board has them
fn pins_valid(pins: &PinAssignments) -> bool {
    let dedicated = [
        ("joystick_y", pins.joystick_y.pin, JOYSTICK_Y_PIN),
        ("buzzer", pins.buzzer.pin, BUZZER_PIN),
        ("matrix", pins.matrix.pin, MATRIX_PIN),
    ];
    let mut ok = true;
    for (name, configured, wired) in dedicated {
        if configured != wired {
            warn!("{} is wired to gpio{}, config says gpio{}", name, wired, configured);
            ok = false;
        }
    }

    let general = [
        pins.button_a.pin,
        pins.button_b.pin,
        pins.joystick_button.pin,
        pins.led_red.pin,
        pins.led_green.pin,
        pins.led_blue.pin,
    ];
    let mut alloc = GpioAllocator::new();
    for pin in general {
        if let Err(e) = alloc.allocate_general(pin) {
            warn!("gpio{}: {}", pin, e);
            ok = false;
        }
    }
    ok
}
