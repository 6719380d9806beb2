//! Operator feedback
//!
//! The core reports what happens through the [`Feedback`] trait. Calls are
//! fire-and-forget: implementations must not block the control flow. On the
//! firmware every call turns into a [`FeedbackEvent`] pushed into a channel,
//! and the effects task renders it with the cues from [`cue`].

pub mod cue;
pub mod indicator;
pub mod player;

pub use cue::{CueStep, Effect, EffectMapper, Frame, LedColor};
pub use indicator::{Indicator, RgbIndicator};
pub use player::EffectsPlayer;

use crate::access::PasswordResult;
use crate::procedure::{MachineId, ProcedureResult, StepEvent};

/// Everything the core reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackEvent {
    ProcedureStarted(MachineId),
    StepProgress { step_index: usize, event: StepEvent },
    ProcedureResult(ProcedureResult),
    Password(PasswordResult),
    LockoutEntered,
    LockoutCleared,
    Activated(MachineId),
}

/// Receiver of controller progress
///
/// Only [`Feedback::emit`] is required; the named callbacks build the
/// matching [`FeedbackEvent`].
pub trait Feedback {
    fn emit(&mut self, event: FeedbackEvent);

    fn on_procedure_started(&mut self, machine: MachineId) {
        self.emit(FeedbackEvent::ProcedureStarted(machine));
    }

    fn on_step_progress(&mut self, step_index: usize, event: StepEvent) {
        self.emit(FeedbackEvent::StepProgress { step_index, event });
    }

    fn on_procedure_result(&mut self, result: ProcedureResult) {
        self.emit(FeedbackEvent::ProcedureResult(result));
    }

    fn on_password_result(&mut self, result: PasswordResult) {
        self.emit(FeedbackEvent::Password(result));
    }

    fn on_lockout_entered(&mut self) {
        self.emit(FeedbackEvent::LockoutEntered);
    }

    fn on_lockout_cleared(&mut self) {
        self.emit(FeedbackEvent::LockoutCleared);
    }

    fn on_activation(&mut self, machine: MachineId) {
        self.emit(FeedbackEvent::Activated(machine));
    }
}

impl<T: Feedback + ?Sized> Feedback for &mut T {
    fn emit(&mut self, event: FeedbackEvent) {
        (**self).emit(event);
    }
}

/// Feedback sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl Feedback for NoopFeedback {
    fn emit(&mut self, _event: FeedbackEvent) {}
}
