//! Effect cues
//!
//! Pure data describing how each [`FeedbackEvent`] looks and sounds. The
//! [`EffectsPlayer`](super::EffectsPlayer) executes them; this module only
//! decides which cue goes with which event.

use interlock_hal::{Rgb, MATRIX_PIXELS};

use super::FeedbackEvent;
use crate::access::PasswordResult;
use crate::procedure::{MachineId, ProcedureResult, Step, StepEvent};

/// Indicator LED colours used by the cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    Off,
    Red,
    Green,
    Blue,
}

impl LedColor {
    /// (red, green, blue) channel states
    pub const fn channels(self) -> (bool, bool, bool) {
        match self {
            LedColor::Off => (false, false, false),
            LedColor::Red => (true, false, false),
            LedColor::Green => (false, true, false),
            LedColor::Blue => (false, false, true),
        }
    }
}

/// Monochrome 5x5 frame, pixel 0 first
pub type Frame = [bool; MATRIX_PIXELS];

/// Cross drawn corner-in
pub const CROSS_FRAMES: [Frame; 3] = [
    [
        true, false, false, false, true, //
        false, false, false, false, false, //
        false, false, false, false, false, //
        false, false, false, false, false, //
        true, false, false, false, true,
    ],
    [
        true, false, false, false, true, //
        false, true, false, true, false, //
        false, false, false, false, false, //
        false, true, false, true, false, //
        true, false, false, false, true,
    ],
    [
        true, false, false, false, true, //
        false, true, false, true, false, //
        false, false, true, false, false, //
        false, true, false, true, false, //
        true, false, false, false, true,
    ],
];

/// Square growing from the centre out to the border
pub const SQUARE_FRAMES: [Frame; 3] = [
    [
        false, false, false, false, false, //
        false, false, false, false, false, //
        false, false, true, false, false, //
        false, false, false, false, false, //
        false, false, false, false, false,
    ],
    [
        false, false, false, false, false, //
        false, true, true, true, false, //
        false, true, true, true, false, //
        false, true, true, true, false, //
        false, false, false, false, false,
    ],
    [
        true, true, true, true, true, //
        true, false, false, false, true, //
        true, false, false, false, true, //
        true, false, false, false, true, //
        true, true, true, true, true,
    ],
];

/// Dim colours for the password frames
pub const DIM_RED: Rgb = Rgb::new(10, 0, 0);
pub const DIM_GREEN: Rgb = Rgb::new(0, 10, 0);

/// Bright colours for the full-matrix sweep
pub const SWEEP_RED: Rgb = Rgb::new(190, 0, 0);
pub const SWEEP_GREEN: Rgb = Rgb::new(0, 190, 0);

/// One instruction of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueStep {
    /// Set the indicator LED
    Led(LedColor),
    /// Sound the buzzer for a while, then silence it
    Tone { freq_hz: u32, duration_ms: u32 },
    /// Do nothing for a while
    Pause(u32),
    /// Play frames in order, hold the last one, then clear
    Frames {
        frames: &'static [Frame],
        color: Rgb,
        frame_ms: u32,
        hold_ms: u32,
    },
    /// Fill the matrix pixel by pixel, pulse, then empty it in reverse
    Sweep(Rgb),
}

pub const PASSWORD_DENIED: &[CueStep] = &[
    CueStep::Led(LedColor::Red),
    CueStep::Tone {
        freq_hz: 200,
        duration_ms: 1_000,
    },
    CueStep::Led(LedColor::Off),
    CueStep::Frames {
        frames: &CROSS_FRAMES,
        color: DIM_RED,
        frame_ms: 150,
        hold_ms: 1_000,
    },
];

pub const PASSWORD_GRANTED: &[CueStep] = &[
    CueStep::Led(LedColor::Green),
    CueStep::Tone {
        freq_hz: 1_200,
        duration_ms: 1_000,
    },
    CueStep::Pause(200),
    CueStep::Led(LedColor::Off),
    CueStep::Frames {
        frames: &SQUARE_FRAMES,
        color: DIM_GREEN,
        frame_ms: 150,
        hold_ms: 1_000,
    },
];

pub const PRESS_COUNTED: &[CueStep] = &[
    CueStep::Tone {
        freq_hz: 1_000,
        duration_ms: 100,
    },
    CueStep::Led(LedColor::Green),
    CueStep::Pause(200),
    CueStep::Led(LedColor::Off),
];

/// Press counted while the indicator is already showing the step colour
pub const PRESS_COUNTED_QUIET: &[CueStep] = &[
    CueStep::Tone {
        freq_hz: 1_000,
        duration_ms: 100,
    },
    CueStep::Pause(200),
];

pub const THRESHOLD_REACHED: &[CueStep] = &[
    CueStep::Tone {
        freq_hz: 1_500,
        duration_ms: 500,
    },
    CueStep::Led(LedColor::Green),
    CueStep::Pause(500),
    CueStep::Led(LedColor::Off),
];

pub const HOLD_COMPLETED: &[CueStep] = &[
    CueStep::Tone {
        freq_hz: 2_000,
        duration_ms: 1_000,
    },
    CueStep::Led(LedColor::Green),
    CueStep::Pause(1_000),
    CueStep::Led(LedColor::Off),
];

pub const STEP_PASSED: &[CueStep] = &[
    CueStep::Led(LedColor::Green),
    CueStep::Pause(500),
    CueStep::Led(LedColor::Off),
];

pub const RED_WHILE_COUNTING: &[CueStep] = &[CueStep::Led(LedColor::Red)];

pub const LED_OFF: &[CueStep] = &[CueStep::Led(LedColor::Off)];

pub const ACTIVATED: &[CueStep] = &[CueStep::Sweep(SWEEP_GREEN)];

pub const PROCEDURE_FAILED: &[CueStep] = &[CueStep::Sweep(SWEEP_RED)];

pub const LOCKOUT_ENTERED: &[CueStep] = &[
    CueStep::Tone {
        freq_hz: 300,
        duration_ms: 2_000,
    },
    CueStep::Sweep(SWEEP_RED),
];

pub const LOCKOUT_CLEARED: &[CueStep] = &[
    CueStep::Led(LedColor::Green),
    CueStep::Tone {
        freq_hz: 1_200,
        duration_ms: 300,
    },
    CueStep::Led(LedColor::Off),
];

/// What the effects task should do for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Play a cue to completion (stops any blinking)
    Play(&'static [CueStep]),
    /// Blink the indicator until told otherwise
    Blink(LedColor),
    /// Stop blinking and turn the indicator off
    StopBlink,
    Nothing,
}

/// Maps feedback events to effects
///
/// Remembers which machine and step are running, since a few cues differ
/// per machine or per step kind.
#[derive(Debug, Clone, Default)]
pub struct EffectMapper {
    machine: Option<MachineId>,
    step: Option<Step>,
}

impl EffectMapper {
    pub const fn new() -> Self {
        Self {
            machine: None,
            step: None,
        }
    }

    pub fn effect_for(&mut self, event: &FeedbackEvent) -> Effect {
        match *event {
            FeedbackEvent::ProcedureStarted(machine) => {
                self.machine = Some(machine);
                self.step = None;
                Effect::Nothing
            }
            FeedbackEvent::StepProgress { step_index, event } => {
                self.step_effect(step_index, event)
            }
            FeedbackEvent::ProcedureResult(ProcedureResult::Succeeded) => {
                self.machine = None;
                Effect::Nothing
            }
            FeedbackEvent::ProcedureResult(ProcedureResult::Failed { .. }) => {
                self.machine = None;
                Effect::Play(PROCEDURE_FAILED)
            }
            FeedbackEvent::Password(PasswordResult::Granted) => Effect::Play(PASSWORD_GRANTED),
            FeedbackEvent::Password(PasswordResult::Denied) => Effect::Play(PASSWORD_DENIED),
            FeedbackEvent::LockoutEntered => Effect::Play(LOCKOUT_ENTERED),
            FeedbackEvent::LockoutCleared => Effect::Play(LOCKOUT_CLEARED),
            FeedbackEvent::Activated(_) => Effect::Play(ACTIVATED),
        }
    }

    fn step_effect(&mut self, step_index: usize, event: StepEvent) -> Effect {
        // Machine B's counting step shows red until it passes
        let red_counting = self.machine == Some(MachineId::B) && step_index == 0;

        match event {
            StepEvent::Started(step) => {
                self.step = Some(step);
                if red_counting {
                    Effect::Play(RED_WHILE_COUNTING)
                } else {
                    Effect::Nothing
                }
            }
            StepEvent::PressCounted { .. } if red_counting => Effect::Play(PRESS_COUNTED_QUIET),
            StepEvent::PressCounted { .. } => Effect::Play(PRESS_COUNTED),
            StepEvent::ThresholdReached { .. } => Effect::Play(THRESHOLD_REACHED),
            StepEvent::HoldStarted => Effect::Blink(LedColor::Blue),
            StepEvent::HoldReleased { .. } => Effect::StopBlink,
            StepEvent::Passed => match self.step {
                Some(step) if step.is_hold() => Effect::Play(HOLD_COMPLETED),
                _ if red_counting => Effect::Play(STEP_PASSED),
                _ => Effect::Nothing,
            },
            StepEvent::TimedOut => Effect::Play(LED_OFF),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::definitions::{MACHINE_A_STEPS, MACHINE_B_STEPS};

    fn progress(step_index: usize, event: StepEvent) -> FeedbackEvent {
        FeedbackEvent::StepProgress { step_index, event }
    }

    #[test]
    fn test_password_cues() {
        let mut mapper = EffectMapper::new();
        assert_eq!(
            mapper.effect_for(&FeedbackEvent::Password(PasswordResult::Denied)),
            Effect::Play(PASSWORD_DENIED)
        );
        assert_eq!(
            mapper.effect_for(&FeedbackEvent::Password(PasswordResult::Granted)),
            Effect::Play(PASSWORD_GRANTED)
        );
    }

    #[test]
    fn test_machine_b_counting_is_red() {
        let mut mapper = EffectMapper::new();
        mapper.effect_for(&FeedbackEvent::ProcedureStarted(MachineId::B));
        assert_eq!(
            mapper.effect_for(&progress(0, StepEvent::Started(MACHINE_B_STEPS[0]))),
            Effect::Play(RED_WHILE_COUNTING)
        );
        assert_eq!(
            mapper.effect_for(&progress(0, StepEvent::PressCounted { count: 1, target: 3 })),
            Effect::Play(PRESS_COUNTED_QUIET)
        );
        assert_eq!(
            mapper.effect_for(&progress(0, StepEvent::Passed)),
            Effect::Play(STEP_PASSED)
        );
    }

    #[test]
    fn test_machine_a_counting_flashes_green() {
        let mut mapper = EffectMapper::new();
        mapper.effect_for(&FeedbackEvent::ProcedureStarted(MachineId::A));
        assert_eq!(
            mapper.effect_for(&progress(0, StepEvent::Started(MACHINE_A_STEPS[0]))),
            Effect::Nothing
        );
        assert_eq!(
            mapper.effect_for(&progress(0, StepEvent::PressCounted { count: 1, target: 5 })),
            Effect::Play(PRESS_COUNTED)
        );
        assert_eq!(
            mapper.effect_for(&progress(0, StepEvent::Passed)),
            Effect::Nothing
        );
    }

    #[test]
    fn test_hold_blinks_then_celebrates() {
        let mut mapper = EffectMapper::new();
        mapper.effect_for(&FeedbackEvent::ProcedureStarted(MachineId::A));
        mapper.effect_for(&progress(2, StepEvent::Started(MACHINE_A_STEPS[2])));
        assert_eq!(
            mapper.effect_for(&progress(2, StepEvent::HoldStarted)),
            Effect::Blink(LedColor::Blue)
        );
        assert_eq!(
            mapper.effect_for(&progress(2, StepEvent::HoldReleased { held_ms: 10 })),
            Effect::StopBlink
        );
        assert_eq!(
            mapper.effect_for(&progress(2, StepEvent::Passed)),
            Effect::Play(HOLD_COMPLETED)
        );
    }

    #[test]
    fn test_outcome_sweeps() {
        let mut mapper = EffectMapper::new();
        assert_eq!(
            mapper.effect_for(&FeedbackEvent::Activated(MachineId::A)),
            Effect::Play(ACTIVATED)
        );
        assert_eq!(
            mapper.effect_for(&FeedbackEvent::ProcedureResult(ProcedureResult::Failed {
                at_step: 1
            })),
            Effect::Play(PROCEDURE_FAILED)
        );
        assert_eq!(
            mapper.effect_for(&FeedbackEvent::LockoutEntered),
            Effect::Play(LOCKOUT_ENTERED)
        );
    }

    #[test]
    fn test_frames_are_symmetric() {
        for frame in CROSS_FRAMES.iter().chain(SQUARE_FRAMES.iter()) {
            for i in 0..MATRIX_PIXELS {
                assert_eq!(frame[i], frame[MATRIX_PIXELS - 1 - i]);
            }
        }
    }
}
