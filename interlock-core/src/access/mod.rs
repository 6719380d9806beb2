//! Password gate and lockout
//!
//! Three wrong machine passwords, across both machines, lock the system.
//! While locked only the admin password is checked; accepting it unlocks and
//! clears the counter.

pub mod credentials;
pub mod state;

pub use credentials::{Credentials, Password, MAX_PASSWORD_LEN};
pub use state::{AccessEvent, AccessState, MAX_FAILED_ATTEMPTS};

use crate::error::InterlockError;
use crate::procedure::MachineId;

/// Outcome of a password comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PasswordResult {
    Granted,
    Denied,
}

/// Outcome of an admin password check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdminCheck {
    /// Accepted while locked; the system is unlocked again
    Unlocked,
    /// Accepted while unlocked
    Accepted,
    /// Wrong admin password
    Rejected,
}

/// Attempt counter plus the stored credentials
#[derive(Debug, Clone)]
pub struct AccessControl {
    state: AccessState,
    credentials: Credentials,
}

impl AccessControl {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            state: AccessState::INITIAL,
            credentials,
        }
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Check a machine password
    ///
    /// Fails with `SystemLocked` while locked, without looking at the
    /// stored passwords.
    pub fn check_password(
        &mut self,
        machine: MachineId,
        input: &str,
    ) -> Result<PasswordResult, InterlockError> {
        if self.state.is_locked() {
            return Err(InterlockError::SystemLocked);
        }

        let (result, event) = if self.credentials.matches_machine(machine, input) {
            (PasswordResult::Granted, AccessEvent::PasswordGranted)
        } else {
            (PasswordResult::Denied, AccessEvent::PasswordDenied)
        };
        self.state = self.state.transition(event);
        Ok(result)
    }

    /// Check the admin password; unlocks when locked
    pub fn check_admin_password(&mut self, input: &str) -> AdminCheck {
        let was_locked = self.state.is_locked();
        let accepted = self.credentials.matches_admin(input);
        let event = if accepted {
            AccessEvent::AdminAccepted
        } else {
            AccessEvent::AdminRejected
        };
        self.state = self.state.transition(event);

        match (accepted, was_locked) {
            (true, true) => AdminCheck::Unlocked,
            (true, false) => AdminCheck::Accepted,
            (false, _) => AdminCheck::Rejected,
        }
    }

    /// Open an admin session for changing machine passwords
    ///
    /// Not available while locked; the lockout has to be cleared first.
    pub fn admin_session(&mut self, input: &str) -> Result<AdminSession<'_>, InterlockError> {
        if self.state.is_locked() {
            return Err(InterlockError::SystemLocked);
        }
        match self.check_admin_password(input) {
            // Not counted, so there is no attempt budget to report
            AdminCheck::Rejected => Err(InterlockError::PasswordDenied { remaining: 0 }),
            _ => Ok(AdminSession { access: self }),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Proof of a successful admin login
pub struct AdminSession<'a> {
    access: &'a mut AccessControl,
}

impl AdminSession<'_> {
    /// Replace a machine password
    pub fn set_machine_password(
        &mut self,
        machine: MachineId,
        password: &str,
    ) -> Result<(), InterlockError> {
        self.access.credentials.set_machine(machine, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access() -> AccessControl {
        AccessControl::new(Credentials::new("admin123", "1234", "5678").unwrap())
    }

    #[test]
    fn test_correct_password_granted() {
        let mut ac = access();
        assert_eq!(ac.check_password(MachineId::A, "1234"), Ok(PasswordResult::Granted));
        assert_eq!(ac.check_password(MachineId::B, "5678"), Ok(PasswordResult::Granted));
        // Passwords are per machine
        assert_eq!(ac.check_password(MachineId::B, "1234"), Ok(PasswordResult::Denied));
    }

    #[test]
    fn test_mixed_machine_denials_lock() {
        let mut ac = access();
        ac.check_password(MachineId::A, "x").unwrap();
        ac.check_password(MachineId::B, "y").unwrap();
        assert!(!ac.is_locked());
        ac.check_password(MachineId::A, "z").unwrap();
        assert!(ac.is_locked());
    }

    #[test]
    fn test_locked_rejects_correct_password() {
        let mut ac = access();
        for _ in 0..3 {
            ac.check_password(MachineId::A, "nope").unwrap();
        }
        assert_eq!(
            ac.check_password(MachineId::A, "1234"),
            Err(InterlockError::SystemLocked)
        );
        assert_eq!(ac.state(), AccessState::Locked);
    }

    #[test]
    fn test_admin_unlock_and_reset() {
        let mut ac = access();
        for _ in 0..3 {
            ac.check_password(MachineId::B, "nope").unwrap();
        }
        assert_eq!(ac.check_admin_password("wrong"), AdminCheck::Rejected);
        assert!(ac.is_locked());
        assert_eq!(ac.check_admin_password("admin123"), AdminCheck::Unlocked);
        assert_eq!(ac.state(), AccessState::Unlocked { failed_attempts: 0 });
        assert_eq!(ac.check_password(MachineId::A, "1234"), Ok(PasswordResult::Granted));
    }

    #[test]
    fn test_admin_failure_not_counted() {
        let mut ac = access();
        for _ in 0..5 {
            assert_eq!(ac.check_admin_password("wrong"), AdminCheck::Rejected);
        }
        assert_eq!(ac.state(), AccessState::INITIAL);
    }

    #[test]
    fn test_admin_session_changes_passwords() {
        let mut ac = access();
        {
            let mut session = ac.admin_session("admin123").unwrap();
            session.set_machine_password(MachineId::A, "aaaa").unwrap();
            session.set_machine_password(MachineId::B, "").unwrap();
        }
        assert_eq!(ac.check_password(MachineId::A, "1234"), Ok(PasswordResult::Denied));
        assert_eq!(ac.check_password(MachineId::A, "aaaa"), Ok(PasswordResult::Granted));
        assert_eq!(ac.check_password(MachineId::B, ""), Ok(PasswordResult::Granted));
    }

    #[test]
    fn test_admin_session_refused_when_locked() {
        let mut ac = access();
        for _ in 0..3 {
            ac.check_password(MachineId::A, "nope").unwrap();
        }
        assert!(matches!(
            ac.admin_session("admin123"),
            Err(InterlockError::SystemLocked)
        ));
        // Still locked; the session path does not unlock
        assert!(ac.is_locked());
    }

    #[test]
    fn test_admin_session_wrong_password() {
        let mut ac = access();
        ac.check_password(MachineId::A, "nope").unwrap();
        assert!(matches!(
            ac.admin_session("guess"),
            Err(InterlockError::PasswordDenied { remaining: 0 })
        ));
    }
}
