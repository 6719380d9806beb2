//! Stored passwords
//!
//! Plain in-memory strings, lost on power-down.

use heapless::String;

use crate::error::InterlockError;
use crate::procedure::MachineId;

/// Longest accepted password (bytes)
pub const MAX_PASSWORD_LEN: usize = 19;

pub type Password = String<MAX_PASSWORD_LEN>;

/// Admin and per-machine passwords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    admin: Password,
    machine_a: Password,
    machine_b: Password,
}

impl Credentials {
    pub fn new(admin: &str, machine_a: &str, machine_b: &str) -> Result<Self, InterlockError> {
        Ok(Self {
            admin: to_password(admin)?,
            machine_a: to_password(machine_a)?,
            machine_b: to_password(machine_b)?,
        })
    }

    pub fn from_passwords(admin: Password, machine_a: Password, machine_b: Password) -> Self {
        Self {
            admin,
            machine_a,
            machine_b,
        }
    }

    fn machine(&self, machine: MachineId) -> &Password {
        match machine {
            MachineId::A => &self.machine_a,
            MachineId::B => &self.machine_b,
        }
    }

    pub fn matches_machine(&self, machine: MachineId, input: &str) -> bool {
        self.machine(machine).as_str() == input
    }

    pub fn matches_admin(&self, input: &str) -> bool {
        self.admin.as_str() == input
    }

    pub fn set_machine(&mut self, machine: MachineId, password: &str) -> Result<(), InterlockError> {
        let password = to_password(password)?;
        match machine {
            MachineId::A => self.machine_a = password,
            MachineId::B => self.machine_b = password,
        }
        Ok(())
    }
}

fn to_password(s: &str) -> Result<Password, InterlockError> {
    Password::try_from(s).map_err(|_| InterlockError::PasswordTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_limit() {
        let longest = "0123456789012345678";
        assert_eq!(longest.len(), MAX_PASSWORD_LEN);
        assert!(Credentials::new("a", longest, "b").is_ok());
        assert_eq!(
            Credentials::new("a", "01234567890123456789", "b"),
            Err(InterlockError::PasswordTooLong)
        );
    }

    #[test]
    fn test_failed_update_keeps_old_password() {
        let mut c = Credentials::new("admin123", "1234", "5678").unwrap();
        assert_eq!(
            c.set_machine(MachineId::A, "this password is far too long"),
            Err(InterlockError::PasswordTooLong)
        );
        assert!(c.matches_machine(MachineId::A, "1234"));
    }

    #[test]
    fn test_exact_match_only() {
        let c = Credentials::new("admin123", "1234", "5678").unwrap();
        assert!(!c.matches_machine(MachineId::A, "12345"));
        assert!(!c.matches_machine(MachineId::A, "123"));
        assert!(!c.matches_admin("ADMIN123"));
    }
}
