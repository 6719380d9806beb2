//! Interlock controller
//!
//! Ties the pieces together: a machine password gates the machine's
//! procedure, and only a completed procedure activates the machine.
//!
//! ```text
//! request_activation(machine, password)
//!     │
//!     ├── locked? ───────────────► Err(SystemLocked)
//!     ├── wrong password ────────► Err(PasswordDenied), maybe lockout
//!     └── granted
//!           └── procedure_for(machine).run()
//!                 ├── Failed ────► Err(ProcedureFailed)
//!                 └── Succeeded ─► on_activation(machine), Ok(())
//! ```

use embedded_hal_async::delay::DelayNs;

use crate::access::{AccessControl, AdminCheck, AdminSession, PasswordResult};
use crate::config::InterlockConfig;
use crate::error::InterlockError;
use crate::feedback::Feedback;
use crate::input::{AnalogSource, InputSource};
use crate::procedure::{procedure_for, MachineId, StepEvaluator};
use crate::time::Clock;
use crate::waiter::TimedWaiter;

/// Access control plus procedure execution for both machines
pub struct Controller<I, A, C, D, F> {
    access: AccessControl,
    evaluator: StepEvaluator<I, A, C, D>,
    feedback: F,
}

impl<I, A, C, D, F> Controller<I, A, C, D, F>
where
    I: InputSource,
    A: AnalogSource,
    C: Clock,
    D: DelayNs,
    F: Feedback,
{
    pub fn new(
        config: &InterlockConfig,
        inputs: I,
        analog: A,
        clock: C,
        delay: D,
        feedback: F,
    ) -> Self {
        let waiter =
            TimedWaiter::new(clock, delay).with_poll_interval(config.timing.poll_interval_ms);
        Self {
            access: AccessControl::new(config.credentials()),
            evaluator: StepEvaluator::new(inputs, analog, waiter),
            feedback,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.access.is_locked()
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Sleep on the controller's delay source
    pub async fn pause_ms(&mut self, ms: u32) {
        self.evaluator.waiter_mut().sleep_ms(ms).await;
    }

    /// Authenticate, then run the machine's procedure
    ///
    /// `Ok(())` means the machine may be activated.
    pub async fn request_activation(
        &mut self,
        machine: MachineId,
        password: &str,
    ) -> Result<(), InterlockError> {
        let result = self.access.check_password(machine, password)?;
        self.feedback.on_password_result(result);

        if result == PasswordResult::Denied {
            let state = self.access.state();
            if state.is_locked() {
                self.feedback.on_lockout_entered();
            }
            return Err(InterlockError::PasswordDenied {
                remaining: state.remaining_attempts(),
            });
        }

        procedure_for(machine)
            .run(&mut self.evaluator, &mut self.feedback)
            .await
            .into_result(machine)?;

        self.feedback.on_activation(machine);
        Ok(())
    }

    /// Clear a lockout with the admin password
    ///
    /// A no-op when not locked. A wrong password is not counted.
    pub fn unlock(&mut self, admin_password: &str) -> Result<(), InterlockError> {
        if !self.access.is_locked() {
            return Ok(());
        }
        match self.access.check_admin_password(admin_password) {
            AdminCheck::Rejected => {
                self.feedback.on_password_result(PasswordResult::Denied);
                Err(InterlockError::PasswordDenied { remaining: 0 })
            }
            AdminCheck::Unlocked | AdminCheck::Accepted => {
                self.feedback.on_lockout_cleared();
                Ok(())
            }
        }
    }

    /// Log in as admin to change machine passwords
    pub fn admin_session(
        &mut self,
        admin_password: &str,
    ) -> Result<AdminSession<'_>, InterlockError> {
        match self.access.admin_session(admin_password) {
            Ok(session) => {
                self.feedback.on_password_result(PasswordResult::Granted);
                Ok(session)
            }
            Err(InterlockError::SystemLocked) => Err(InterlockError::SystemLocked),
            Err(e) => {
                self.feedback.on_password_result(PasswordResult::Denied);
                Err(e)
            }
        }
    }
}
