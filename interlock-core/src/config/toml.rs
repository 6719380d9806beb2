//! Minimal TOML reader for `interlock.toml`
//!
//! Handles only what the config file needs:
//! - `[passwords]`, `[timing]` and `[pins]` sections
//! - `key = value` with string, integer or boolean values
//! - `#` comments, whole-line or trailing
//!
//! No allocation; strings land in fixed-capacity buffers.

use heapless::String;

use super::types::{InterlockConfig, PinConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection { line: usize },
    /// Key not valid in its section
    UnknownKey { line: usize },
    /// Value of the wrong type or out of range
    InvalidValue { line: usize },
    /// Malformed pin string
    InvalidPin { line: usize },
    /// String longer than its buffer
    ValueTooLong { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Passwords,
    Timing,
    Pins,
}

/// Parse the config file, starting from the defaults
pub fn parse_config(input: &str) -> Result<InterlockConfig, ParseError> {
    let mut config = InterlockConfig::default();
    let mut section = Section::Root;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ParseError::InvalidSection { line: line_no });
            }
            section = parse_section_header(&header[1..header.len() - 1])
                .ok_or(ParseError::InvalidSection { line: line_no })?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ParseError::InvalidValue { line: line_no })?;
        apply_value(&mut config, section, key, value).map_err(|kind| kind.at(line_no))?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "passwords" => Some(Section::Passwords),
        "timing" => Some(Section::Timing),
        "pins" => Some(Section::Pins),
        _ => None,
    }
}

/// Error kind before the line number is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    UnknownKey,
    InvalidValue,
    InvalidPin,
    ValueTooLong,
}

impl Kind {
    fn at(self, line: usize) -> ParseError {
        match self {
            Kind::UnknownKey => ParseError::UnknownKey { line },
            Kind::InvalidValue => ParseError::InvalidValue { line },
            Kind::InvalidPin => ParseError::InvalidPin { line },
            Kind::ValueTooLong => ParseError::ValueTooLong { line },
        }
    }
}

fn apply_value(
    config: &mut InterlockConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), Kind> {
    match section {
        Section::Root => Err(Kind::UnknownKey),
        Section::Passwords => {
            let slot = match key {
                "admin" => &mut config.passwords.admin,
                "machine_a" => &mut config.passwords.machine_a,
                "machine_b" => &mut config.passwords.machine_b,
                _ => return Err(Kind::UnknownKey),
            };
            *slot = parse_bounded(value)?;
            Ok(())
        }
        Section::Timing => {
            let timing = &mut config.timing;
            match key {
                "debounce_ms" => timing.debounce_ms = parse_int(value)?,
                "poll_interval_ms" => {
                    let ms: u32 = parse_int(value)?;
                    if ms == 0 {
                        return Err(Kind::InvalidValue);
                    }
                    timing.poll_interval_ms = ms;
                }
                "boot_delay_ms" => timing.boot_delay_ms = parse_int(value)?,
                _ => return Err(Kind::UnknownKey),
            }
            Ok(())
        }
        Section::Pins => {
            let pins = &mut config.pins;
            let slot = match key {
                "button_a" => &mut pins.button_a,
                "button_b" => &mut pins.button_b,
                "joystick_button" => &mut pins.joystick_button,
                "joystick_y" => &mut pins.joystick_y,
                "buzzer" => &mut pins.buzzer,
                "led_red" => &mut pins.led_red,
                "led_green" => &mut pins.led_green,
                "led_blue" => &mut pins.led_blue,
                "matrix" => &mut pins.matrix,
                _ => return Err(Kind::UnknownKey),
            };
            *slot = parse_pin(value)?;
            Ok(())
        }
    }
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(s: &str) -> &str {
    let mut in_string = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return s[..i].trim_end(),
            _ => {}
        }
    }
    s
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Remove surrounding quotes; bare words pass through
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_bounded<const N: usize>(value: &str) -> Result<String<N>, Kind> {
    String::try_from(parse_string(value)).map_err(|_| Kind::ValueTooLong)
}

/// Parse an integer, allowing `_` separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, Kind> {
    let mut digits: String<20> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| Kind::InvalidValue)?;
    }
    digits.parse().map_err(|_| Kind::InvalidValue)
}

/// Parse a pin string like "gpio10", "!gpio5" or "^!gpio22"
fn parse_pin(value: &str) -> Result<PinConfig, Kind> {
    let mut s = parse_string(value);
    let mut pin = PinConfig::default();

    loop {
        if let Some(rest) = s.strip_prefix('!') {
            pin.inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pin.pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let num = s.strip_prefix("gpio").ok_or(Kind::InvalidPin)?;
    pin.pin = num.parse().map_err(|_| Kind::InvalidPin)?;
    if pin.pin > 29 {
        return Err(Kind::InvalidPin);
    }
    Ok(pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio10").unwrap();
        assert_eq!(pin, PinConfig::new(10));

        let pin = parse_pin("\"^!gpio22\"").unwrap();
        assert_eq!(pin.pin, 22);
        assert!(pin.inverted);
        assert!(pin.pull_up);

        assert_eq!(parse_pin("gpio30"), Err(Kind::InvalidPin));
        assert_eq!(parse_pin("pin5"), Err(Kind::InvalidPin));
        assert_eq!(parse_pin("\"!gpio\""), Err(Kind::InvalidPin));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("42 # answer"), "42");
        assert_eq!(strip_comment("\"a#b\" # tail"), "\"a#b\"");
        assert_eq!(strip_comment("plain"), "plain");
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), InterlockConfig::default());
        assert_eq!(
            parse_config("# nothing here\n\n").unwrap(),
            InterlockConfig::default()
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Interlock board
[passwords]
admin = "root#1"   # hash inside quotes is kept
machine_a = "4321"
machine_b = ""

[timing]
debounce_ms = 250
poll_interval_ms = 5
boot_delay_ms = 2_000

[pins]
button_a = "^!gpio15"
buzzer = "gpio21"
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.passwords.admin.as_str(), "root#1");
        assert_eq!(config.passwords.machine_a.as_str(), "4321");
        assert_eq!(config.passwords.machine_b.as_str(), "");
        assert_eq!(config.timing.debounce_ms, 250);
        assert_eq!(config.timing.poll_interval_ms, 5);
        assert_eq!(config.timing.boot_delay_ms, 2000);
        assert_eq!(config.pins.button_a, PinConfig::button(15));
        assert_eq!(config.pins.buzzer, PinConfig::new(21));
        // Untouched keys keep their defaults
        assert_eq!(config.pins.button_b, PinConfig::button(6));
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        assert_eq!(
            parse_config("[display]\n"),
            Err(ParseError::InvalidSection { line: 1 })
        );
        assert_eq!(
            parse_config("[timing]\nspeed = 3\n"),
            Err(ParseError::UnknownKey { line: 2 })
        );
        assert_eq!(
            parse_config("[timing]\n\ndebounce_ms = soon\n"),
            Err(ParseError::InvalidValue { line: 3 })
        );
        assert_eq!(
            parse_config("[timing]\npoll_interval_ms = 0\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[pins]\nbuzzer = \"gpio99\"\n"),
            Err(ParseError::InvalidPin { line: 2 })
        );
        assert_eq!(
            parse_config("[passwords]\nadmin = \"01234567890123456789\"\n"),
            Err(ParseError::ValueTooLong { line: 2 })
        );
        assert_eq!(
            parse_config("admin = \"x\"\n"),
            Err(ParseError::UnknownKey { line: 1 })
        );
    }
}
