//! Error taxonomy
//!
//! None of these are fatal. Every error is returned to the session loop,
//! which reports it and goes back to the menu.

use crate::procedure::MachineId;

/// Errors surfaced by the interlock core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterlockError {
    /// Edge arrived inside the debounce window and was dropped
    DebounceRejected,
    /// A step's deadline elapsed before its condition was met
    StepTimeout { step: usize },
    /// Procedure aborted at the given step (0-based)
    ProcedureFailed { machine: MachineId, at_step: usize },
    /// Wrong password; `remaining` attempts before lockout
    PasswordDenied { remaining: u8 },
    /// Locked out; only the admin password is accepted
    SystemLocked,
    /// New password does not fit the credential buffer
    PasswordTooLong,
    /// Analog read failed
    AnalogFault,
}

impl InterlockError {
    /// Whether the operator should be told about this error
    ///
    /// Debounce rejections are internal noise.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, InterlockError::DebounceRejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_is_not_user_visible() {
        assert!(!InterlockError::DebounceRejected.is_user_visible());
        assert!(InterlockError::SystemLocked.is_user_visible());
        assert!(InterlockError::PasswordDenied { remaining: 2 }.is_user_visible());
    }
}
