//! Timed condition waiter
//!
//! The only suspension primitive of the controller. Every step archetype is
//! expressed as a predicate handed to [`TimedWaiter::wait_until`] or
//! [`TimedWaiter::hold_while`].

use embedded_hal_async::delay::DelayNs;

use crate::time::{ms_to_us, Clock};

/// Default polling cadence
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// Result of waiting for a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    Satisfied,
    TimedOut,
}

/// Result of measuring a continuous hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldOutcome {
    /// Condition stayed true for the full duration
    Held,
    /// Condition dropped after `held_ms`
    Released { held_ms: u32 },
}

/// Polls predicates against a clock, sleeping between polls
pub struct TimedWaiter<C, D> {
    clock: C,
    delay: D,
    poll_interval_ms: u32,
}

impl<C: Clock, D: DelayNs> TimedWaiter<C, D> {
    pub fn new(clock: C, delay: D) -> Self {
        Self {
            clock,
            delay,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Override the polling cadence (clamped to at least 1 ms)
    pub fn with_poll_interval(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms.max(1);
        self
    }

    pub fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    pub fn now_us(&self) -> u64 {
        self.clock.now_us()
    }

    /// Sleep for a fixed time
    pub async fn sleep_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }

    /// Wait until `predicate` holds or `deadline_ms` has elapsed since the call
    pub async fn wait_until<P>(&mut self, deadline_ms: u32, predicate: P) -> WaitOutcome
    where
        P: FnMut() -> bool,
    {
        let deadline_us = self.clock.now_us().saturating_add(ms_to_us(deadline_ms));
        self.wait_until_at(deadline_us, predicate).await
    }

    /// Wait until `predicate` holds or the clock reaches `deadline_us`
    ///
    /// Each poll checks the deadline first, so a predicate that only becomes
    /// true after the deadline is never observed.
    pub async fn wait_until_at<P>(&mut self, deadline_us: u64, mut predicate: P) -> WaitOutcome
    where
        P: FnMut() -> bool,
    {
        loop {
            if self.clock.now_us() >= deadline_us {
                return WaitOutcome::TimedOut;
            }
            if predicate() {
                return WaitOutcome::Satisfied;
            }
            self.delay.delay_ms(self.poll_interval_ms).await;
        }
    }

    /// Measure how long `predicate` stays true, up to `hold_ms`
    pub async fn hold_while<P>(&mut self, hold_ms: u32, mut predicate: P) -> HoldOutcome
    where
        P: FnMut() -> bool,
    {
        let start = self.clock.now_us();
        let hold_us = ms_to_us(hold_ms);
        loop {
            let elapsed = self.clock.now_us().saturating_sub(start);
            if !predicate() {
                return HoldOutcome::Released {
                    held_ms: (elapsed / 1_000) as u32,
                };
            }
            if elapsed >= hold_us {
                return HoldOutcome::Held;
            }
            self.delay.delay_ms(self.poll_interval_ms).await;
        }
    }
}
