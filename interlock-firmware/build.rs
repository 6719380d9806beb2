//! Build script for interlock-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates interlock.toml at compile time

use std::collections::HashMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Longest password the firmware can store
const MAX_PASSWORD_LEN: usize = 19;

/// Pins bound to a peripheral in the firmware, by config key
const FIXED_PINS: [(&str, u8); 3] = [("joystick_y", 26), ("buzzer", 10), ("matrix", 7)];

/// Pins owned by the console UART
const UART_PINS: [u8; 2] = [0, 1];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    passwords: Passwords,
    #[serde(default)]
    timing: Timing,
    #[serde(default)]
    pins: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Passwords {
    admin: Option<String>,
    machine_a: Option<String>,
    machine_b: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Timing {
    debounce_ms: Option<u32>,
    poll_interval_ms: Option<u32>,
    boot_delay_ms: Option<u32>,
}

const PIN_KEYS: [&str; 9] = [
    "button_a",
    "button_b",
    "joystick_button",
    "joystick_y",
    "buzzer",
    "led_red",
    "led_green",
    "led_blue",
    "matrix",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate interlock.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=interlock.toml");

    let config_path = Path::new("interlock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: interlock.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds interlock.toml from the interlock-firmware  ║\n\
            ║  directory. Create one (an empty file uses all defaults).        ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read interlock.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: FileConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid interlock.toml                                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_passwords(&config.passwords, &mut errors);
    validate_timing(&config.timing, &mut errors);
    validate_pins(&config.pins, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid interlock configuration                          ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=interlock.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn validate_passwords(passwords: &Passwords, errors: &mut Vec<String>) {
    let entries = [
        ("admin", &passwords.admin),
        ("machine_a", &passwords.machine_a),
        ("machine_b", &passwords.machine_b),
    ];
    for (key, value) in entries {
        if let Some(pw) = value {
            if pw.len() > MAX_PASSWORD_LEN {
                errors.push(format!(
                    "[passwords] {} is longer than {} bytes",
                    key, MAX_PASSWORD_LEN
                ));
            }
            if pw.contains(['\r', '\n']) {
                errors.push(format!("[passwords] {} cannot contain a line break", key));
            }
        }
    }
    if passwords.admin.as_deref() == Some("") {
        errors.push("[passwords] admin cannot be empty".to_string());
    }
}

fn validate_timing(timing: &Timing, errors: &mut Vec<String>) {
    if timing.poll_interval_ms == Some(0) {
        errors.push("[timing] poll_interval_ms must be at least 1".to_string());
    }
    if let Some(ms) = timing.debounce_ms {
        if ms > 5_000 {
            errors.push("[timing] debounce_ms must be 0-5000".to_string());
        }
    }
    if let Some(ms) = timing.boot_delay_ms {
        if ms > 60_000 {
            errors.push("[timing] boot_delay_ms must be 0-60000".to_string());
        }
    }
}

/// Parse "gpioN" with optional "!" / "^" prefixes
fn parse_pin(value: &str) -> Option<u8> {
    let pin = value.trim_start_matches(['!', '^']).strip_prefix("gpio")?;
    pin.parse().ok().filter(|n| *n < 30)
}

fn validate_pins(pins: &HashMap<String, String>, errors: &mut Vec<String>) {
    let mut seen: HashMap<u8, &str> = HashMap::new();

    for (key, value) in pins {
        if !PIN_KEYS.contains(&key.as_str()) {
            errors.push(format!("[pins] unknown key '{}'", key));
            continue;
        }
        let Some(pin) = parse_pin(value) else {
            errors.push(format!("[pins] {} = '{}' is not a valid pin", key, value));
            continue;
        };
        match FIXED_PINS.iter().find(|(k, _)| k == key) {
            Some((_, fixed)) if pin != *fixed => {
                errors.push(format!("[pins] {} is wired to gpio{}", key, fixed));
            }
            None if FIXED_PINS.iter().any(|(_, fixed)| *fixed == pin) => {
                errors.push(format!("[pins] {} cannot use dedicated pin gpio{}", key, pin));
            }
            _ => {}
        }
        if UART_PINS.contains(&pin) {
            errors.push(format!("[pins] {} uses console UART pin gpio{}", key, pin));
        }
        if let Some(other) = seen.insert(pin, key) {
            errors.push(format!("[pins] gpio{} used by both {} and {}", pin, other, key));
        }
    }
}
