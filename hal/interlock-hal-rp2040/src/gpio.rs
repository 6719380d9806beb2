//! GPIO allocation and output wrapper

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;
use heapless::FnvIndexSet;

use crate::pins::{PinError, DEDICATED_PINS};

/// Number of GPIO pins on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Tracks which GPIO pins are in use so a config cannot assign one twice
pub struct GpioAllocator {
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Claim a pin
    pub fn allocate(&mut self, pin: u8) -> Result<(), PinError> {
        if pin as usize >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        match self.allocated.insert(pin) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PinError::AlreadyTaken),
            Err(_) => Err(PinError::InvalidPin),
        }
    }

    /// Claim a pin that must not be one of the dedicated peripheral pins
    pub fn allocate_general(&mut self, pin: u8) -> Result<(), PinError> {
        if DEDICATED_PINS.contains(&pin) {
            return Err(PinError::Reserved);
        }
        self.allocate(pin)
    }

    pub fn is_allocated(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

/// Push-pull output with configurable polarity
///
/// `set_high` turns the load on; for an inverted pin that drives the line
/// low.
pub struct GpioOutput {
    pin: Output<'static>,
    inverted: bool,
}

impl GpioOutput {
    /// Create the output in its off state
    pub fn new(pin: Peri<'static, AnyPin>, inverted: bool) -> Self {
        let off = if inverted { Level::High } else { Level::Low };
        Self {
            pin: Output::new(pin, off),
            inverted,
        }
    }
}

impl interlock_hal::OutputPin for GpioOutput {
    fn set_high(&mut self) {
        if self.inverted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high() != self.inverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator() {
        let mut alloc = GpioAllocator::new();

        assert!(alloc.allocate(5).is_ok());
        assert!(alloc.is_allocated(5));
        assert!(matches!(alloc.allocate(5), Err(PinError::AlreadyTaken)));
        assert!(alloc.allocate(6).is_ok());
        assert_eq!(alloc.allocated_count(), 2);

        assert!(matches!(alloc.allocate(30), Err(PinError::InvalidPin)));
    }

    #[test]
    fn test_dedicated_pins_rejected_for_general_use() {
        let mut alloc = GpioAllocator::new();
        for pin in DEDICATED_PINS {
            assert!(matches!(alloc.allocate_general(pin), Err(PinError::Reserved)));
        }
        assert!(alloc.allocate_general(22).is_ok());
    }
}
