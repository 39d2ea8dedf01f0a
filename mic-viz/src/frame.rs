use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// Pixels on the matrix (5 x 5).
pub const LED_COUNT: usize = 25;
pub const OFF: Rgb888 = Rgb888::BLACK;

/// Full set of pixel colors for one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedFrame {
    pixels: [Rgb888; LED_COUNT],
}

impl LedFrame {
    /// Every pixel off.
    pub const fn dark() -> Self {
        Self {
            pixels: [OFF; LED_COUNT],
        }
    }

    /// Returns `false` and leaves the frame untouched when `index` is off the matrix.
    pub fn set(&mut self, index: usize, color: Rgb888) -> bool {
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<Rgb888> {
        self.pixels.get(index).copied()
    }

    pub fn pixels(&self) -> &[Rgb888; LED_COUNT] {
        &self.pixels
    }

    /// Indices and colors of pixels that are not off, in index order.
    pub fn lit(&self) -> impl Iterator<Item = (usize, Rgb888)> + '_ {
        self.pixels
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, color)| color != OFF)
    }

    pub fn is_dark(&self) -> bool {
        self.lit().next().is_none()
    }
}

impl Default for LedFrame {
    fn default() -> Self {
        Self::dark()
    }
}
