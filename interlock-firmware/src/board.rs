//! Glue between the core traits and embassy

use defmt::*;
use embassy_time::Instant;

use interlock_core::feedback::{Feedback, FeedbackEvent};
use interlock_core::time::Clock;

use crate::channels::{ConsoleMessage, CONSOLE_CHANNEL, FEEDBACK_CHANNEL};

/// Monotonic clock backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Feedback sink that forwards events to the effects and console tasks
///
/// Never waits: when a channel is full the event is dropped with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelFeedback;

impl Feedback for ChannelFeedback {
    fn emit(&mut self, event: FeedbackEvent) {
        debug!("Feedback: {}", event);
        if FEEDBACK_CHANNEL.try_send(event).is_err() {
            warn!("Effects queue full, dropped {}", event);
        }
        if CONSOLE_CHANNEL.try_send(ConsoleMessage::Event(event)).is_err() {
            warn!("Console queue full, dropped {}", event);
        }
    }
}
