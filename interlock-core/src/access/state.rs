//! Attempt/lockout state machine
//!
//! Pure transitions; the [`AccessControl`](super::AccessControl) wrapper
//! decides which event happened.

/// Failed password attempts that trigger lockout
pub const MAX_FAILED_ATTEMPTS: u8 = 3;

/// Access states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessState {
    /// Machine passwords accepted; `failed_attempts` < MAX_FAILED_ATTEMPTS
    Unlocked { failed_attempts: u8 },
    /// Only the admin password is accepted
    Locked,
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessEvent {
    PasswordGranted,
    PasswordDenied,
    AdminAccepted,
    AdminRejected,
}

impl Default for AccessState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl AccessState {
    pub const INITIAL: Self = AccessState::Unlocked { failed_attempts: 0 };

    pub fn is_locked(&self) -> bool {
        matches!(self, AccessState::Locked)
    }

    pub fn failed_attempts(&self) -> u8 {
        match *self {
            AccessState::Unlocked { failed_attempts } => failed_attempts,
            AccessState::Locked => MAX_FAILED_ATTEMPTS,
        }
    }

    /// Denials left before lockout
    pub fn remaining_attempts(&self) -> u8 {
        MAX_FAILED_ATTEMPTS.saturating_sub(self.failed_attempts())
    }

    /// Process an event and return the next state
    pub fn transition(self, event: AccessEvent) -> Self {
        use AccessEvent::*;
        use AccessState::*;

        match (self, event) {
            (Unlocked { failed_attempts }, PasswordDenied) => {
                let failed_attempts = failed_attempts.saturating_add(1);
                if failed_attempts >= MAX_FAILED_ATTEMPTS {
                    Locked
                } else {
                    Unlocked { failed_attempts }
                }
            }

            // A success does not forgive earlier failures
            (Unlocked { .. }, PasswordGranted) => self,

            (Locked, AdminAccepted) => Self::INITIAL,

            // Admin login outside lockout leaves the counter alone
            (Unlocked { .. }, AdminAccepted) => self,

            // Admin failures are never counted
            (_, AdminRejected) => self,

            // Machine passwords are not checked while locked
            (Locked, PasswordGranted | PasswordDenied) => self,
        }
    }
}
