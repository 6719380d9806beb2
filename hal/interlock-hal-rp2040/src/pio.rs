//! PIO clock helpers

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// PIO clock divider for a target instruction rate
///
/// Returned as the raw bits of the 16.8 fixed-point divider the state
/// machine expects. Rates above the system clock clamp to 1.0.
pub fn clock_divider_bits(instr_hz: u32) -> u32 {
    if instr_hz == 0 {
        return 0xFFFF_FF00;
    }
    let bits = (SYS_CLK_HZ as u64 * 256) / instr_hz as u64;
    bits.clamp(256, 0xFFFF_FF00) as u32
}
