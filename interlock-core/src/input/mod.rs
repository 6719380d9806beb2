//! Debounced digital inputs
//!
//! Edges arrive from the GPIO layer (an interrupt or an edge-waiting task)
//! and are filtered here into press events. The procedure evaluator only
//! ever reads this state through [`InputSource`].
//!
//! Hold detection uses the raw level from [`InputSource::is_pressed`], which
//! is not debounced.

pub mod analog;

pub use analog::{AnalogChannel, AnalogSample, AnalogSource, Comparator, ADC_MAX};

use portable_atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::InterlockError;
use crate::time::ms_to_us;

/// Default debounce window
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;

/// Sentinel for "no edge accepted yet"
const NEVER: u64 = u64::MAX;

/// Logical input identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputId {
    ButtonA,
    ButtonB,
    JoystickButton,
}

impl InputId {
    /// Every input, in bank order
    pub const ALL: [InputId; 3] = [InputId::ButtonA, InputId::ButtonB, InputId::JoystickButton];

    const fn index(self) -> usize {
        self as usize
    }

    /// Human readable name for console output
    pub fn label(self) -> &'static str {
        match self {
            InputId::ButtonA => "button A",
            InputId::ButtonB => "button B",
            InputId::JoystickButton => "joystick button",
        }
    }
}

/// An accepted press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressEvent {
    pub input: InputId,
    /// Timestamp of the accepted edge (µs)
    pub at_us: u64,
}

/// Read side of the input layer
pub trait InputSource {
    /// Instantaneous raw level (true = pressed)
    fn is_pressed(&self, input: InputId) -> bool;

    /// Read and clear the pending press, if any
    fn take_press(&self, input: InputId) -> bool;

    /// Drop a stale pending press
    fn clear_pending(&self, input: InputId) {
        let _ = self.take_press(input);
    }
}

impl<T: InputSource + ?Sized> InputSource for &T {
    fn is_pressed(&self, input: InputId) -> bool {
        (**self).is_pressed(input)
    }

    fn take_press(&self, input: InputId) -> bool {
        (**self).take_press(input)
    }

    fn clear_pending(&self, input: InputId) {
        (**self).clear_pending(input)
    }
}

/// State of one debounced input
///
/// Every field is an atomic so the edge layer can write while the control
/// flow reads. The edge layer is the only writer of `last_accepted_us`.
#[derive(Debug)]
pub struct DigitalInput {
    id: InputId,
    pressed: AtomicBool,
    pending: AtomicBool,
    pending_at_us: AtomicU64,
    last_accepted_us: AtomicU64,
}

impl DigitalInput {
    pub const fn new(id: InputId) -> Self {
        Self {
            id,
            pressed: AtomicBool::new(false),
            pending: AtomicBool::new(false),
            pending_at_us: AtomicU64::new(0),
            last_accepted_us: AtomicU64::new(NEVER),
        }
    }

    pub fn id(&self) -> InputId {
        self.id
    }

    /// Offer a falling edge seen at `now_us`
    ///
    /// The edge is accepted if it is the first one, or if at least
    /// `window_us` has passed since the last accepted edge; an edge exactly
    /// one window after the last accepted one is accepted. An accepted edge
    /// overwrites any pending press.
    pub fn on_edge(&self, now_us: u64, window_us: u64) -> Result<PressEvent, InterlockError> {
        let last = self.last_accepted_us.load(Ordering::Acquire);
        if last != NEVER && now_us.saturating_sub(last) < window_us {
            return Err(InterlockError::DebounceRejected);
        }

        self.last_accepted_us.store(now_us, Ordering::Release);
        self.pending_at_us.store(now_us, Ordering::Release);
        self.pending.store(true, Ordering::Release);

        Ok(PressEvent {
            input: self.id,
            at_us: now_us,
        })
    }

    /// Record the raw pin level
    pub fn set_level(&self, pressed: bool) {
        self.pressed.store(pressed, Ordering::Release);
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    /// Read and clear the pending press
    pub fn take_press_event(&self) -> Option<PressEvent> {
        if self.pending.swap(false, Ordering::AcqRel) {
            Some(PressEvent {
                input: self.id,
                at_us: self.pending_at_us.load(Ordering::Acquire),
            })
        } else {
            None
        }
    }

    /// Timestamp of the last accepted edge
    pub fn last_accepted_us(&self) -> Option<u64> {
        match self.last_accepted_us.load(Ordering::Acquire) {
            NEVER => None,
            t => Some(t),
        }
    }
}

/// All digital inputs of the controller
///
/// Designed to live in a `static` so edge tasks and the session task can
/// share it without locks.
#[derive(Debug)]
pub struct InputBank {
    inputs: [DigitalInput; 3],
    debounce_us: AtomicU64,
}

impl Default for InputBank {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBank {
    pub const fn new() -> Self {
        Self {
            inputs: [
                DigitalInput::new(InputId::ButtonA),
                DigitalInput::new(InputId::ButtonB),
                DigitalInput::new(InputId::JoystickButton),
            ],
            debounce_us: AtomicU64::new(ms_to_us(DEFAULT_DEBOUNCE_MS)),
        }
    }

    /// Change the debounce window (applies to all inputs)
    pub fn set_debounce_ms(&self, ms: u32) {
        self.debounce_us.store(ms_to_us(ms), Ordering::Release);
    }

    pub fn debounce_us(&self) -> u64 {
        self.debounce_us.load(Ordering::Acquire)
    }

    pub fn input(&self, id: InputId) -> &DigitalInput {
        &self.inputs[id.index()]
    }

    /// Offer a falling edge on `id`
    pub fn on_edge(&self, id: InputId, now_us: u64) -> Result<PressEvent, InterlockError> {
        self.input(id).on_edge(now_us, self.debounce_us())
    }

    /// Record the raw level of `id`
    pub fn set_level(&self, id: InputId, pressed: bool) {
        self.input(id).set_level(pressed);
    }

    pub fn take_press_event(&self, id: InputId) -> Option<PressEvent> {
        self.input(id).take_press_event()
    }
}

impl InputSource for InputBank {
    fn is_pressed(&self, input: InputId) -> bool {
        self.input(input).is_pressed()
    }

    fn take_press(&self, input: InputId) -> bool {
        self.take_press_event(input).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WINDOW: u64 = 300_000;

    #[test]
    fn test_first_edge_accepted() {
        let bank = InputBank::new();
        let ev = bank.on_edge(InputId::ButtonA, 5).unwrap();
        assert_eq!(ev.input, InputId::ButtonA);
        assert_eq!(ev.at_us, 5);
        assert!(bank.take_press(InputId::ButtonA));
        assert!(!bank.take_press(InputId::ButtonA));
    }

    #[test]
    fn test_edge_inside_window_rejected() {
        let bank = InputBank::new();
        bank.on_edge(InputId::ButtonA, 1_000_000).unwrap();
        assert_eq!(
            bank.on_edge(InputId::ButtonA, 1_299_999),
            Err(InterlockError::DebounceRejected)
        );
        // Rejected edge does not move the window
        assert_eq!(
            bank.input(InputId::ButtonA).last_accepted_us(),
            Some(1_000_000)
        );
        assert!(bank.on_edge(InputId::ButtonA, 1_300_000).is_ok());
    }

    #[test]
    fn test_edge_exactly_one_window_later_accepted() {
        let bank = InputBank::new();
        bank.on_edge(InputId::ButtonA, 10_000).unwrap();
        assert_eq!(
            bank.on_edge(InputId::ButtonA, 10_000 + WINDOW - 1),
            Err(InterlockError::DebounceRejected)
        );
        assert!(bank.on_edge(InputId::ButtonA, 10_000 + WINDOW).is_ok());
    }

    #[test]
    fn test_windows_are_per_input() {
        let bank = InputBank::new();
        bank.on_edge(InputId::ButtonA, 1_000).unwrap();
        assert!(bank.on_edge(InputId::ButtonB, 1_001).is_ok());
        assert!(bank.take_press(InputId::ButtonA));
        assert!(bank.take_press(InputId::ButtonB));
    }

    #[test]
    fn test_new_press_overwrites_pending() {
        let bank = InputBank::new();
        bank.on_edge(InputId::ButtonA, 0).unwrap();
        bank.on_edge(InputId::ButtonA, WINDOW).unwrap();
        let ev = bank.take_press_event(InputId::ButtonA).unwrap();
        assert_eq!(ev.at_us, WINDOW);
        assert!(bank.take_press_event(InputId::ButtonA).is_none());
    }

    #[test]
    fn test_level_is_raw() {
        let bank = InputBank::new();
        bank.set_level(InputId::ButtonB, true);
        assert!(bank.is_pressed(InputId::ButtonB));
        // Level alone never creates a press
        assert!(!bank.take_press(InputId::ButtonB));
        bank.set_level(InputId::ButtonB, false);
        assert!(!bank.is_pressed(InputId::ButtonB));
    }

    #[test]
    fn test_configurable_window() {
        let bank = InputBank::new();
        bank.set_debounce_ms(50);
        bank.on_edge(InputId::ButtonA, 0).unwrap();
        assert!(bank.on_edge(InputId::ButtonA, 50_000).is_ok());
    }

    proptest! {
        #[test]
        fn prop_close_pair_yields_one_press(start in 0u64..1_000_000_000, gap in 0u64..WINDOW) {
            let bank = InputBank::new();
            let mut accepted = 0;
            for t in [start, start + gap] {
                if bank.on_edge(InputId::ButtonA, t).is_ok() {
                    accepted += 1;
                }
            }
            prop_assert_eq!(accepted, 1);
        }

        #[test]
        fn prop_spaced_edges_each_accepted(start in 0u64..1_000_000_000, gaps in proptest::collection::vec(WINDOW..5 * WINDOW, 1..20)) {
            let bank = InputBank::new();
            let mut t = start;
            prop_assert!(bank.on_edge(InputId::ButtonB, t).is_ok());
            for gap in gaps {
                t += gap;
                prop_assert!(bank.on_edge(InputId::ButtonB, t).is_ok());
            }
        }

        #[test]
        fn prop_accepted_edges_are_window_apart(gaps in proptest::collection::vec(0u64..2 * WINDOW, 1..40)) {
            let bank = InputBank::new();
            let mut t = 0;
            let mut last: Option<u64> = None;
            for gap in gaps {
                t += gap;
                if let Ok(ev) = bank.on_edge(InputId::ButtonA, t) {
                    if let Some(prev) = last {
                        prop_assert!(ev.at_us - prev >= WINDOW);
                    }
                    last = Some(ev.at_us);
                }
            }
        }
    }
}
