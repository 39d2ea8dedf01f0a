#![allow(dead_code)]

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::{ErrorType, SpiBus};
use mic_dsp::{AdcDma, TransferConfig};
use mic_viz::{LedMatrix, LED_COUNT};

/// ADC + transfer channel that fills every window from `source`, or stalls
/// while the shared `stall` flag is set.
pub struct FakeAdcDma {
    pub source: Vec<u16>,
    pub stall: Rc<Cell<bool>>,
    pub running: bool,
    pub transfers: usize,
}

impl FakeAdcDma {
    pub fn new(source: &[u16]) -> Self {
        Self {
            source: source.to_vec(),
            stall: Rc::new(Cell::new(false)),
            running: false,
            transfers: 0,
        }
    }

    pub fn constant(code: u16) -> Self {
        Self::new(&[code])
    }
}

impl AdcDma for FakeAdcDma {
    fn drain_fifo(&mut self) {}

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    async fn transfer(&mut self, _config: &TransferConfig, dest: &mut [u16]) -> usize {
        self.transfers += 1;
        self.running = true;
        if self.stall.get() {
            return core::future::pending::<usize>().await;
        }
        for (i, slot) in dest.iter_mut().enumerate() {
            *slot = self.source[i % self.source.len()];
        }
        dest.len()
    }
}

#[derive(Default)]
pub struct FakeDelay;

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixOp {
    Clear,
    Set(usize, Rgb888),
    Flush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushFailed;

/// Records every call and keeps a copy of each flushed frame.
pub struct RecordingMatrix {
    pub ops: Vec<MatrixOp>,
    pub shown: Vec<[Rgb888; LED_COUNT]>,
    pub fail_flush: bool,
    pending: [Rgb888; LED_COUNT],
}

impl RecordingMatrix {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            shown: Vec::new(),
            fail_flush: false,
            pending: [Rgb888::BLACK; LED_COUNT],
        }
    }

    pub fn flushes(&self) -> usize {
        self.ops.iter().filter(|op| **op == MatrixOp::Flush).count()
    }
}

impl LedMatrix for RecordingMatrix {
    type Error = FlushFailed;

    fn clear(&mut self) {
        self.ops.push(MatrixOp::Clear);
        self.pending = [Rgb888::BLACK; LED_COUNT];
    }

    fn set(&mut self, index: usize, color: Rgb888) {
        self.ops.push(MatrixOp::Set(index, color));
        if let Some(pixel) = self.pending.get_mut(index) {
            *pixel = color;
        }
    }

    async fn flush(&mut self) -> Result<(), FlushFailed> {
        self.ops.push(MatrixOp::Flush);
        if self.fail_flush {
            return Err(FlushFailed);
        }
        self.shown.push(self.pending);
        Ok(())
    }
}

/// SPI bus that keeps every written byte.
#[derive(Default)]
pub struct RecordingSpi {
    pub written: Vec<Vec<u8>>,
    pub flushes: usize,
}

impl ErrorType for RecordingSpi {
    type Error = Infallible;
}

impl SpiBus for RecordingSpi {
    async fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    async fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        self.written.push(words.to_vec());
        Ok(())
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
        read.fill(0);
        self.written.push(write.to_vec());
        Ok(())
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        self.written.push(words.to_vec());
        words.fill(0);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Infallible> {
        self.flushes += 1;
        Ok(())
    }
}
