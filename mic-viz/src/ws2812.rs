//! WS2812 pixels driven through the MOSI line of an SPI bus.
//!
//! At 3.2 MHz one SPI bit lasts 312.5 ns, so each WS2812 data bit is sent as a
//! 4-bit symbol: `1110` for a one (0.94 us high) and `1000` for a zero
//! (0.31 us high). A run of zero bytes after the pixels latches the frame.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_hal_async::spi::SpiBus;

use crate::frame::{LED_COUNT, OFF};
use crate::matrix::LedMatrix;

pub const SPI_FREQUENCY_KHZ: u32 = 3_200;
/// 3 color bytes, 4 SPI bytes each.
pub const BYTES_PER_LED: usize = 12;
/// 100 us of low line.
pub const RESET_BYTES: usize = 40;
pub const FRAME_BYTES: usize = LED_COUNT * BYTES_PER_LED + RESET_BYTES;

const SYMBOL_ONE: u8 = 0b1110;
const SYMBOL_ZERO: u8 = 0b1000;

fn symbol(bit: u8) -> u8 {
    if bit & 1 == 1 {
        SYMBOL_ONE
    } else {
        SYMBOL_ZERO
    }
}

/// Expand one color byte, MSB first, into four SPI bytes.
pub fn encode_byte(byte: u8) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = 6 - 2 * i;
        *slot = (symbol(byte >> (shift + 1)) << 4) | symbol(byte >> shift);
    }
    out
}

/// WS2812 expects green, red, blue.
pub fn encode_pixel(color: Rgb888) -> [u8; BYTES_PER_LED] {
    let mut out = [0u8; BYTES_PER_LED];
    for (chunk, byte) in out.chunks_exact_mut(4).zip([color.g(), color.r(), color.b()]) {
        chunk.copy_from_slice(&encode_byte(byte));
    }
    out
}

/// Encode `pixels` followed by the reset tail. Returns the number of bytes written.
///
/// `out` must hold `pixels.len() * BYTES_PER_LED + RESET_BYTES` bytes.
pub fn encode_frame(pixels: &[Rgb888], out: &mut [u8]) -> usize {
    let len = pixels.len() * BYTES_PER_LED + RESET_BYTES;
    let (data, tail) = out[..len].split_at_mut(pixels.len() * BYTES_PER_LED);
    for (chunk, &color) in data.chunks_exact_mut(BYTES_PER_LED).zip(pixels) {
        chunk.copy_from_slice(&encode_pixel(color));
    }
    tail.fill(0);
    len
}

/// `LedMatrix` for a chain of `LED_COUNT` WS2812 pixels.
pub struct Ws2812Spi<SPI> {
    spi: SPI,
    pixels: [Rgb888; LED_COUNT],
    buffer: [u8; FRAME_BYTES],
}

impl<SPI: SpiBus> Ws2812Spi<SPI> {
    /// `spi` must be clocked at `SPI_FREQUENCY_KHZ` in mode 0.
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            pixels: [OFF; LED_COUNT],
            buffer: [0; FRAME_BYTES],
        }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiBus> LedMatrix for Ws2812Spi<SPI> {
    type Error = SPI::Error;

    fn clear(&mut self) {
        self.pixels = [OFF; LED_COUNT];
    }

    fn set(&mut self, index: usize, color: Rgb888) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        let len = encode_frame(&self.pixels, &mut self.buffer);
        self.spi.write(&self.buffer[..len]).await?;
        self.spi.flush().await
    }
}
