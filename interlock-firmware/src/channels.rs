//! Inter-task communication channels

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use interlock_core::feedback::FeedbackEvent;
use interlock_core::InterlockError;

/// Channel capacity for feedback events
const FEEDBACK_CHANNEL_SIZE: usize = 16;

/// Channel capacity for console output
const CONSOLE_CHANNEL_SIZE: usize = 32;

/// Something to print on the console
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleMessage {
    Text(&'static str),
    /// Echo of a typed byte
    Echo(u8),
    /// Placeholder for a typed password character
    Mask,
    Event(FeedbackEvent),
    Error(InterlockError),
}

/// Feedback events for the effects task
pub static FEEDBACK_CHANNEL: Channel<CriticalSectionRawMutex, FeedbackEvent, FEEDBACK_CHANNEL_SIZE> =
    Channel::new();

/// Console output, in order, for the console TX task
pub static CONSOLE_CHANNEL: Channel<CriticalSectionRawMutex, ConsoleMessage, CONSOLE_CHANNEL_SIZE> =
    Channel::new();
