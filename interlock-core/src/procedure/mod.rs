//! Challenge procedures
//!
//! A procedure is an ordered list of immutable [`Step`]s. Steps run strictly
//! in order; the first step that times out aborts the procedure. Retrying
//! means running the whole procedure again from step 0.

pub mod definitions;
pub mod evaluator;

pub use definitions::{procedure_for, MACHINE_A, MACHINE_B};
pub use evaluator::StepEvaluator;

use embedded_hal_async::delay::DelayNs;

use crate::error::InterlockError;
use crate::feedback::Feedback;
use crate::input::{AnalogChannel, AnalogSource, Comparator, InputId, InputSource};
use crate::time::Clock;

/// Machine identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineId {
    A,
    B,
}

impl MachineId {
    pub const ALL: [MachineId; 2] = [MachineId::A, MachineId::B];

    pub fn label(self) -> &'static str {
        match self {
            MachineId::A => "A",
            MachineId::B => "B",
        }
    }
}

/// One timed challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Press `input` `target_count` times within `deadline_ms`
    CountPresses {
        input: InputId,
        target_count: u8,
        deadline_ms: u32,
    },
    /// Bring an analog channel across `threshold` within `deadline_ms`
    ///
    /// With a `gate`, the channel is only sampled while the gate input is
    /// held.
    ReachThreshold {
        channel: AnalogChannel,
        comparator: Comparator,
        threshold: u16,
        deadline_ms: u32,
        gate: Option<InputId>,
    },
    /// Hold `input` continuously for `hold_ms`, starting within
    /// `overall_deadline_ms`
    HoldSingle {
        input: InputId,
        hold_ms: u32,
        overall_deadline_ms: u32,
    },
    /// Hold both inputs together for `hold_ms`, starting within
    /// `overall_deadline_ms`
    HoldSimultaneous {
        input_a: InputId,
        input_b: InputId,
        hold_ms: u32,
        overall_deadline_ms: u32,
    },
}

impl Step {
    /// Time allowed for the step's condition to be reached
    pub fn deadline_ms(&self) -> u32 {
        match *self {
            Step::CountPresses { deadline_ms, .. } | Step::ReachThreshold { deadline_ms, .. } => {
                deadline_ms
            }
            Step::HoldSingle {
                overall_deadline_ms,
                ..
            }
            | Step::HoldSimultaneous {
                overall_deadline_ms,
                ..
            } => overall_deadline_ms,
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, Step::HoldSingle { .. } | Step::HoldSimultaneous { .. })
    }
}

/// Result of evaluating one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    Success,
    Timeout,
}

impl StepOutcome {
    /// `Err(StepTimeout)` naming the step at `index` if it timed out
    pub fn into_result(self, index: usize) -> Result<(), InterlockError> {
        match self {
            StepOutcome::Success => Ok(()),
            StepOutcome::Timeout => Err(InterlockError::StepTimeout { step: index }),
        }
    }
}

/// Progress reported while a step runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepEvent {
    /// Step evaluation began
    Started(Step),
    /// An accepted press was counted
    PressCounted { count: u8, target: u8 },
    /// The analog condition was met with this sample
    ThresholdReached { value: u16 },
    /// Hold inputs went down; hold timer running
    HoldStarted,
    /// Hold broken early; timer reset
    HoldReleased { held_ms: u32 },
    /// Step condition met
    Passed,
    /// Step deadline elapsed
    TimedOut,
}

/// Result of running a whole procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProcedureResult {
    Succeeded,
    /// Aborted at this step (0-based); later steps were not evaluated
    Failed { at_step: usize },
}

impl ProcedureResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcedureResult::Succeeded)
    }

    pub fn into_result(self, machine: MachineId) -> Result<(), InterlockError> {
        match self {
            ProcedureResult::Succeeded => Ok(()),
            ProcedureResult::Failed { at_step } => {
                Err(InterlockError::ProcedureFailed { machine, at_step })
            }
        }
    }
}

/// Ordered challenge list for one machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Procedure {
    machine: MachineId,
    steps: &'static [Step],
}

impl Procedure {
    pub const fn new(machine: MachineId, steps: &'static [Step]) -> Self {
        Self { machine, steps }
    }

    pub fn machine(&self) -> MachineId {
        self.machine
    }

    pub fn steps(&self) -> &'static [Step] {
        self.steps
    }

    /// Run every step in order, stopping at the first timeout
    pub async fn run<I, A, C, D, F>(
        &self,
        evaluator: &mut StepEvaluator<I, A, C, D>,
        feedback: &mut F,
    ) -> ProcedureResult
    where
        I: InputSource,
        A: AnalogSource,
        C: Clock,
        D: DelayNs,
        F: Feedback + ?Sized,
    {
        feedback.on_procedure_started(self.machine);

        let mut result = ProcedureResult::Succeeded;
        for (index, step) in self.steps.iter().enumerate() {
            let outcome = evaluator.evaluate(index, step, feedback).await;
            if let Err(InterlockError::StepTimeout { step }) = outcome.into_result(index) {
                result = ProcedureResult::Failed { at_step: step };
                break;
            }
        }

        feedback.on_procedure_result(result);
        result
    }
}
