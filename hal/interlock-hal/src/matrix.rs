//! Addressable LED matrix

/// Number of pixels on the 5x5 matrix
pub const MATRIX_PIXELS: usize = 25;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into the 24-bit GRB word WS2812 pixels expect
    pub const fn to_grb(self) -> u32 {
        ((self.g as u32) << 16) | ((self.r as u32) << 8) | self.b as u32
    }
}

/// A matrix of addressable pixels, written as a whole frame
#[allow(async_fn_in_trait)]
pub trait PixelMatrix {
    /// Push one full frame, pixel 0 first
    async fn write(&mut self, pixels: &[Rgb; MATRIX_PIXELS]);

    /// Turn every pixel off
    async fn clear(&mut self) {
        self.write(&[Rgb::OFF; MATRIX_PIXELS]).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grb_packing() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).to_grb(), 0x34_12_56);
        assert_eq!(Rgb::new(190, 0, 0).to_grb(), 190 << 8);
        assert_eq!(Rgb::OFF.to_grb(), 0);
    }
}
