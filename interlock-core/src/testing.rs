//! Host-side simulation helpers shared by the unit tests
//!
//! `SimClock` only advances when code under test sleeps through `SimDelay`,
//! so every test runs instantly and deterministically. `Bench` replays a
//! script of edges, levels and analog values into a real [`InputBank`] as
//! simulated time passes.

extern crate std;

use core::cell::{Cell, RefCell};
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::error::InterlockError;
use crate::feedback::{Feedback, FeedbackEvent};
use crate::input::{AnalogChannel, AnalogSource, InputBank, InputId, InputSource};
use crate::time::Clock;

/// Simulated monotonic clock (nanosecond resolution)
pub struct SimClock {
    now_ns: Cell<u64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self { now_ns: Cell::new(0) }
    }

    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get() + ns);
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }
}

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        self.now_ns.get() / 1_000
    }
}

/// Delay that advances a [`SimClock`] instead of waiting
pub struct SimDelay<'a> {
    clock: &'a SimClock,
}

impl<'a> SimDelay<'a> {
    pub fn new(clock: &'a SimClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(ns as u64);
    }

    async fn delay_us(&mut self, us: u32) {
        self.clock.advance_ns(us as u64 * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ns(ms as u64 * 1_000_000);
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Edge(InputId),
    Level(InputId, bool),
    Analog(u16),
}

/// Scripted operator: replays hardware activity into an [`InputBank`]
pub struct Bench<'a> {
    clock: &'a SimClock,
    bank: InputBank,
    script: RefCell<Vec<(u64, Action)>>,
    analog: Cell<u16>,
    analog_reads: Cell<usize>,
}

impl<'a> Bench<'a> {
    pub fn new(clock: &'a SimClock) -> Self {
        Self {
            clock,
            bank: InputBank::new(),
            script: RefCell::new(Vec::new()),
            // Joystick resting at centre
            analog: Cell::new(2048),
            analog_reads: Cell::new(0),
        }
    }

    fn schedule(&self, at_ms: u64, action: Action) {
        let mut script = self.script.borrow_mut();
        script.push((at_ms * 1_000, action));
        script.sort_by_key(|(at, _)| *at);
    }

    /// Press and release a button (falling edge at `at_ms`, released 50 ms later)
    pub fn tap(&self, input: InputId, at_ms: u64) -> &Self {
        self.schedule(at_ms, Action::Level(input, true));
        self.schedule(at_ms, Action::Edge(input));
        self.schedule(at_ms + 50, Action::Level(input, false));
        self
    }

    /// Hold a button from `from_ms` until `to_ms`
    pub fn hold(&self, input: InputId, from_ms: u64, to_ms: u64) -> &Self {
        self.schedule(from_ms, Action::Level(input, true));
        self.schedule(from_ms, Action::Edge(input));
        self.schedule(to_ms, Action::Level(input, false));
        self
    }

    /// A bare edge with no level change (contact bounce)
    pub fn bounce(&self, input: InputId, at_ms: u64) -> &Self {
        self.schedule(at_ms, Action::Edge(input));
        self
    }

    /// Set the joystick reading from `at_ms` on
    pub fn analog(&self, at_ms: u64, value: u16) -> &Self {
        self.schedule(at_ms, Action::Analog(value));
        self
    }

    pub fn analog_reads(&self) -> usize {
        self.analog_reads.get()
    }

    pub fn bank(&self) -> &InputBank {
        self.sync();
        &self.bank
    }

    /// Apply every scripted action that is due
    fn sync(&self) {
        let now = self.clock.now_us();
        let mut script = self.script.borrow_mut();
        let due = script.iter().take_while(|(at, _)| *at <= now).count();
        for (at, action) in script.drain(..due) {
            match action {
                Action::Edge(input) => {
                    let _ = self.bank.on_edge(input, at);
                }
                Action::Level(input, pressed) => self.bank.set_level(input, pressed),
                Action::Analog(value) => self.analog.set(value),
            }
        }
    }
}

impl InputSource for Bench<'_> {
    fn is_pressed(&self, input: InputId) -> bool {
        self.sync();
        self.bank.is_pressed(input)
    }

    fn take_press(&self, input: InputId) -> bool {
        self.sync();
        self.bank.take_press(input)
    }
}

impl AnalogSource for &Bench<'_> {
    fn read(&mut self, _channel: AnalogChannel) -> Result<u16, InterlockError> {
        self.sync();
        self.analog_reads.set(self.analog_reads.get() + 1);
        Ok(self.analog.get())
    }
}

/// Feedback sink that remembers everything it was told
#[derive(Default)]
pub struct RecordingFeedback {
    pub events: Vec<FeedbackEvent>,
}

impl Feedback for RecordingFeedback {
    fn emit(&mut self, event: FeedbackEvent) {
        self.events.push(event);
    }
}
