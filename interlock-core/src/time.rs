//! Monotonic time source

/// Microseconds per millisecond
pub const US_PER_MS: u64 = 1_000;

/// Monotonic microsecond clock
///
/// Firmware backs this with `embassy_time::Instant`; tests use a
/// simulated clock that only advances when the code under test sleeps.
pub trait Clock {
    /// Microseconds since an arbitrary, fixed epoch
    fn now_us(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Convert milliseconds to microseconds
pub const fn ms_to_us(ms: u32) -> u64 {
    ms as u64 * US_PER_MS
}
