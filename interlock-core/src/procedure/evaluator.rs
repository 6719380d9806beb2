//! Procedure step evaluator
//!
//! Turns each [`Step`] archetype into predicates for the [`TimedWaiter`].
//! Both hold archetypes share one two-phase loop: wait for the inputs to go
//! down within what is left of the overall deadline, then measure the hold.
//! Letting go restarts the hold timer but not the overall deadline.

use embedded_hal_async::delay::DelayNs;

use super::{Step, StepEvent, StepOutcome};
use crate::feedback::Feedback;
use crate::input::{AnalogChannel, AnalogSource, Comparator, InputId, InputSource};
use crate::time::{ms_to_us, Clock};
use crate::waiter::{HoldOutcome, TimedWaiter, WaitOutcome};

/// Evaluates steps against live inputs
pub struct StepEvaluator<I, A, C, D> {
    inputs: I,
    analog: A,
    waiter: TimedWaiter<C, D>,
}

impl<I, A, C, D> StepEvaluator<I, A, C, D>
where
    I: InputSource,
    A: AnalogSource,
    C: Clock,
    D: DelayNs,
{
    pub fn new(inputs: I, analog: A, waiter: TimedWaiter<C, D>) -> Self {
        Self {
            inputs,
            analog,
            waiter,
        }
    }

    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    pub fn waiter_mut(&mut self) -> &mut TimedWaiter<C, D> {
        &mut self.waiter
    }

    /// Evaluate one step, reporting progress as it goes
    pub async fn evaluate<F: Feedback + ?Sized>(
        &mut self,
        index: usize,
        step: &Step,
        feedback: &mut F,
    ) -> StepOutcome {
        feedback.on_step_progress(index, StepEvent::Started(*step));

        let outcome = match *step {
            Step::CountPresses {
                input,
                target_count,
                deadline_ms,
            } => {
                self.count_presses(index, input, target_count, deadline_ms, feedback)
                    .await
            }
            Step::ReachThreshold {
                channel,
                comparator,
                threshold,
                deadline_ms,
                gate,
            } => {
                self.reach_threshold(
                    index,
                    channel,
                    comparator,
                    threshold,
                    deadline_ms,
                    gate,
                    feedback,
                )
                .await
            }
            Step::HoldSingle {
                input,
                hold_ms,
                overall_deadline_ms,
            } => {
                self.hold(index, &[input], hold_ms, overall_deadline_ms, feedback)
                    .await
            }
            Step::HoldSimultaneous {
                input_a,
                input_b,
                hold_ms,
                overall_deadline_ms,
            } => {
                self.hold(
                    index,
                    &[input_a, input_b],
                    hold_ms,
                    overall_deadline_ms,
                    feedback,
                )
                .await
            }
        };

        let event = match outcome {
            StepOutcome::Success => StepEvent::Passed,
            StepOutcome::Timeout => StepEvent::TimedOut,
        };
        feedback.on_step_progress(index, event);
        outcome
    }

    async fn count_presses<F: Feedback + ?Sized>(
        &mut self,
        index: usize,
        input: InputId,
        target: u8,
        deadline_ms: u32,
        feedback: &mut F,
    ) -> StepOutcome {
        // Presses made before the step started do not count
        self.inputs.clear_pending(input);

        let inputs = &self.inputs;
        let mut count = 0u8;
        let outcome = self
            .waiter
            .wait_until(deadline_ms, || {
                if inputs.take_press(input) {
                    count = count.saturating_add(1);
                    feedback.on_step_progress(index, StepEvent::PressCounted { count, target });
                }
                count >= target
            })
            .await;

        to_step_outcome(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    async fn reach_threshold<F: Feedback + ?Sized>(
        &mut self,
        index: usize,
        channel: AnalogChannel,
        comparator: Comparator,
        threshold: u16,
        deadline_ms: u32,
        gate: Option<InputId>,
        feedback: &mut F,
    ) -> StepOutcome {
        let inputs = &self.inputs;
        let analog = &mut self.analog;
        let mut reached = None;
        let outcome = self
            .waiter
            .wait_until(deadline_ms, || {
                if let Some(gate) = gate {
                    if !inputs.is_pressed(gate) {
                        return false;
                    }
                }
                match analog.read(channel) {
                    Ok(value) if comparator.holds(value, threshold) => {
                        reached = Some(value);
                        true
                    }
                    // A failed read is treated as "not there yet"
                    _ => false,
                }
            })
            .await;

        if let Some(value) = reached {
            feedback.on_step_progress(index, StepEvent::ThresholdReached { value });
        }
        to_step_outcome(outcome)
    }

    async fn hold<F: Feedback + ?Sized>(
        &mut self,
        index: usize,
        held: &[InputId],
        hold_ms: u32,
        overall_deadline_ms: u32,
        feedback: &mut F,
    ) -> StepOutcome {
        let deadline_us = self
            .waiter
            .now_us()
            .saturating_add(ms_to_us(overall_deadline_ms));
        let inputs = &self.inputs;
        let all_down = || held.iter().all(|&input| inputs.is_pressed(input));

        loop {
            if self.waiter.wait_until_at(deadline_us, all_down).await == WaitOutcome::TimedOut {
                return StepOutcome::Timeout;
            }

            // Once started, a hold may run past the overall deadline
            feedback.on_step_progress(index, StepEvent::HoldStarted);
            match self.waiter.hold_while(hold_ms, all_down).await {
                HoldOutcome::Held => return StepOutcome::Success,
                HoldOutcome::Released { held_ms } => {
                    feedback.on_step_progress(index, StepEvent::HoldReleased { held_ms });
                }
            }
        }
    }
}

fn to_step_outcome(outcome: WaitOutcome) -> StepOutcome {
    match outcome {
        WaitOutcome::Satisfied => StepOutcome::Success,
        WaitOutcome::TimedOut => StepOutcome::Timeout,
    }
}
