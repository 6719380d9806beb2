//! Operator console text
//!
//! Parsing of menu choices and typed lines, plus the text written back for
//! prompts, feedback events and errors. The firmware moves bytes between
//! these helpers and the UART.

use core::fmt::{self, Write};

use heapless::Vec;

use crate::access::PasswordResult;
use crate::error::InterlockError;
use crate::feedback::FeedbackEvent;
use crate::input::Comparator;
use crate::procedure::{MachineId, ProcedureResult, Step, StepEvent};

pub const BANNER: &str = "Interlock controller started...\r\n";
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
pub const MENU: &str = "\r\n=== Main Menu ===\r\n\
1. Use machine A\r\n\
2. Use machine B\r\n\
3. Admin mode\r\n\
Choose an option: ";
pub const PROMPT_PASSWORD: &str = "Enter password: ";
pub const PROMPT_UNLOCK: &str = "\r\nSystem locked. Enter the admin password to unlock: ";
pub const PROMPT_ADMIN: &str = "\r\n=== Admin Mode ===\r\nEnter admin password: ";
pub const PROMPT_NEW_A: &str = "\r\nAccess granted.\r\nNew password for machine A: ";
pub const PROMPT_NEW_B: &str = "New password for machine B: ";
pub const PASSWORDS_UPDATED: &str = "\r\nPasswords updated.\r\n";
pub const UNLOCKED: &str = "System unlocked.\r\n";
pub const INVALID_OPTION: &str = "Invalid option!\r\n";
pub const INVALID_INPUT: &str = "Invalid characters, entry ignored.\r\n";
pub const NEWLINE: &str = "\r\n";

/// Main menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuChoice {
    UseMachine(MachineId),
    Admin,
    Invalid,
}

impl MenuChoice {
    /// Parse the leading integer of a line
    ///
    /// Leading whitespace and a sign are accepted, anything after the digits
    /// is ignored. No digits reads as 0, which is invalid.
    pub fn parse(line: &str) -> Self {
        match leading_int(line) {
            1 => MenuChoice::UseMachine(MachineId::A),
            2 => MenuChoice::UseMachine(MachineId::B),
            3 => MenuChoice::Admin,
            _ => MenuChoice::Invalid,
        }
    }
}

fn leading_int(line: &str) -> i64 {
    let s = line.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative {
        -value
    } else {
        value
    }
}

/// What to do with a received byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// Stored; echo it back
    Echo(u8),
    /// Dropped (line full, or LF after CR)
    Ignored,
    /// Line terminated; read it with [`LineBuffer::line`]
    Complete,
}

/// Accumulates one typed line
///
/// Holds at most `N - 1` bytes, matching a C buffer of `N` with its
/// terminator.
#[derive(Debug, Default)]
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
    after_cr: bool,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            after_cr: false,
        }
    }

    pub fn push(&mut self, byte: u8) -> LineEvent {
        let after_cr = core::mem::replace(&mut self.after_cr, byte == b'\r');
        match byte {
            b'\n' if after_cr => LineEvent::Ignored,
            b'\r' | b'\n' => LineEvent::Complete,
            _ if self.buf.len() + 1 >= N => LineEvent::Ignored,
            _ => match self.buf.push(byte) {
                Ok(()) => LineEvent::Echo(byte),
                Err(_) => LineEvent::Ignored,
            },
        }
    }

    /// Current contents, or `None` if the bytes are not valid UTF-8
    pub fn line(&self) -> Option<&str> {
        core::str::from_utf8(&self.buf).ok()
    }

    /// Forget the stored bytes; CR/LF pairing state is kept
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

fn seconds(ms: u32) -> u32 {
    ms / 1000
}

/// Describe what a step asks of the operator
pub fn write_step_prompt<W: Write>(w: &mut W, index: usize, step: &Step) -> fmt::Result {
    write!(w, "STEP {} -> ", index + 1)?;
    match *step {
        Step::CountPresses {
            input,
            target_count,
            deadline_ms,
        } => write!(
            w,
            "Press {} {} times within {} s",
            input.label(),
            target_count,
            seconds(deadline_ms)
        )?,
        Step::ReachThreshold {
            channel,
            comparator,
            threshold,
            deadline_ms,
            gate,
        } => {
            if let Some(gate) = gate {
                write!(w, "Hold {} and move ", gate.label())?;
            } else {
                w.write_str("Move ")?;
            }
            let end = match comparator {
                Comparator::AtLeast => "maximum",
                Comparator::Below => "minimum",
            };
            write!(
                w,
                "{} to {} ({} {}) within {} s",
                channel.label(),
                end,
                comparator.symbol(),
                threshold,
                seconds(deadline_ms)
            )?
        }
        Step::HoldSingle { input, hold_ms, .. } => {
            write!(w, "Hold {} for {} s", input.label(), seconds(hold_ms))?
        }
        Step::HoldSimultaneous {
            input_a,
            input_b,
            hold_ms,
            ..
        } => write!(
            w,
            "Hold {} and {} together for {} s",
            input_a.label(),
            input_b.label(),
            seconds(hold_ms)
        )?,
    }
    w.write_str("...\r\n")
}

/// Console text for a feedback event; some events print nothing
pub fn write_event<W: Write>(w: &mut W, event: &FeedbackEvent) -> fmt::Result {
    match *event {
        FeedbackEvent::ProcedureStarted(machine) => {
            write!(w, "\r\n--- Safety procedure - machine {} ---\r\n", machine.label())
        }
        FeedbackEvent::StepProgress { step_index, event } => match event {
            StepEvent::Started(step) => write_step_prompt(w, step_index, &step),
            StepEvent::PressCounted { count, target } => {
                write!(w, "Pressed {}/{}\r\n", count, target)
            }
            StepEvent::ThresholdReached { value } => write!(w, "Reached ({})\r\n", value),
            StepEvent::HoldStarted => w.write_str("Holding...\r\n"),
            StepEvent::HoldReleased { held_ms } => write!(
                w,
                "Released after {}.{} s, start again\r\n",
                held_ms / 1000,
                (held_ms % 1000) / 100
            ),
            StepEvent::Passed | StepEvent::TimedOut => Ok(()),
        },
        FeedbackEvent::ProcedureResult(ProcedureResult::Failed { at_step }) => {
            write!(w, "Step {} failed!\r\n", at_step + 1)
        }
        FeedbackEvent::ProcedureResult(ProcedureResult::Succeeded) => Ok(()),
        FeedbackEvent::Password(PasswordResult::Granted) => Ok(()),
        FeedbackEvent::Password(PasswordResult::Denied) => Ok(()),
        FeedbackEvent::LockoutEntered => {
            w.write_str("\r\nSystem locked! Contact the administrator.\r\n")
        }
        FeedbackEvent::LockoutCleared => w.write_str(UNLOCKED),
        FeedbackEvent::Activated(machine) => {
            write!(w, "\r\nMachine {} activated.\r\n", machine.label())
        }
    }
}

/// Console text for an error returned to the session
pub fn write_error<W: Write>(w: &mut W, error: &InterlockError) -> fmt::Result {
    match *error {
        InterlockError::PasswordDenied { remaining } if remaining > 0 => {
            write!(w, "Wrong password! Attempts left: {}\r\n", remaining)
        }
        InterlockError::PasswordDenied { .. } => w.write_str("Wrong password!\r\n"),
        InterlockError::SystemLocked => w.write_str("System is locked.\r\n"),
        InterlockError::PasswordTooLong => w.write_str("Password too long.\r\n"),
        InterlockError::ProcedureFailed { machine, .. } => {
            write!(w, "Machine {} was not activated.\r\n", machine.label())
        }
        InterlockError::StepTimeout { step } => write!(w, "Step {} timed out.\r\n", step + 1),
        InterlockError::AnalogFault => w.write_str("Analog input fault.\r\n"),
        InterlockError::DebounceRejected => Ok(()),
    }
}
