//! Buzzer tone output

/// Square-wave tone generator
///
/// The buzzer on the reference board is driven from a PWM slice at 50% duty.
/// Durations are handled by the caller; a tone keeps sounding until
/// [`ToneOutput::silence`] is called.
pub trait ToneOutput {
    /// Start a tone at the given frequency
    ///
    /// A frequency of zero is equivalent to [`ToneOutput::silence`].
    fn start(&mut self, freq_hz: u32);

    /// Stop any tone
    fn silence(&mut self);
}
