//! Built-in challenge procedures for machines A and B

use super::{MachineId, Procedure, Step};
use crate::input::{AnalogChannel, Comparator, InputId};

/// Machine A: five presses, stick to the top, then a long single hold
pub const MACHINE_A_STEPS: [Step; 3] = [
    Step::CountPresses {
        input: InputId::ButtonA,
        target_count: 5,
        deadline_ms: 30_000,
    },
    Step::ReachThreshold {
        channel: AnalogChannel::JoystickY,
        comparator: Comparator::AtLeast,
        threshold: 4070,
        deadline_ms: 10_000,
        gate: None,
    },
    Step::HoldSingle {
        input: InputId::ButtonB,
        hold_ms: 5_000,
        overall_deadline_ms: 7_000,
    },
];

/// Machine B: three presses, stick to the bottom while clicked, then a
/// two-button hold
pub const MACHINE_B_STEPS: [Step; 3] = [
    Step::CountPresses {
        input: InputId::ButtonA,
        target_count: 3,
        deadline_ms: 30_000,
    },
    Step::ReachThreshold {
        channel: AnalogChannel::JoystickY,
        comparator: Comparator::Below,
        threshold: 20,
        deadline_ms: 10_000,
        gate: Some(InputId::JoystickButton),
    },
    Step::HoldSimultaneous {
        input_a: InputId::ButtonA,
        input_b: InputId::ButtonB,
        hold_ms: 3_000,
        overall_deadline_ms: 5_000,
    },
];

pub const MACHINE_A: Procedure = Procedure::new(MachineId::A, &MACHINE_A_STEPS);
pub const MACHINE_B: Procedure = Procedure::new(MachineId::B, &MACHINE_B_STEPS);

/// Procedure guarding `machine`
pub fn procedure_for(machine: MachineId) -> &'static Procedure {
    match machine {
        MachineId::A => &MACHINE_A,
        MachineId::B => &MACHINE_B,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_machine() {
        for machine in MachineId::ALL {
            assert_eq!(procedure_for(machine).machine(), machine);
            assert_eq!(procedure_for(machine).steps().len(), 3);
        }
    }

    #[test]
    fn test_hold_windows_fit_hold_time() {
        for machine in MachineId::ALL {
            for step in procedure_for(machine).steps() {
                if let Step::HoldSingle {
                    hold_ms,
                    overall_deadline_ms,
                    ..
                }
                | Step::HoldSimultaneous {
                    hold_ms,
                    overall_deadline_ms,
                    ..
                } = *step
                {
                    assert!(hold_ms < overall_deadline_ms);
                }
            }
        }
    }

    #[test]
    fn test_only_last_step_is_a_hold() {
        for machine in MachineId::ALL {
            let steps = procedure_for(machine).steps();
            assert!(steps[..2].iter().all(|s| !s.is_hold()));
            assert!(steps[2].is_hold());
        }
    }
}
