use embedded_graphics::pixelcolor::Rgb888;

use crate::frame::LedFrame;

/// Addressable LED device. Pin and pixel count are bound when the driver is built.
#[allow(async_fn_in_trait)]
pub trait LedMatrix {
    type Error;

    /// Turn every pixel off in the pending frame.
    fn clear(&mut self);

    /// Out-of-range indices are ignored.
    fn set(&mut self, index: usize, color: Rgb888);

    /// Push the pending frame to the device in one transmission.
    async fn flush(&mut self) -> Result<(), Self::Error>;

    /// Blank the device.
    async fn init(&mut self) -> Result<(), Self::Error> {
        self.clear();
        self.flush().await
    }
}

/// Clear, write the lit pixels of `frame`, then flush once.
pub async fn present<M: LedMatrix>(frame: &LedFrame, matrix: &mut M) -> Result<(), M::Error> {
    matrix.clear();
    for (index, color) in frame.lit() {
        matrix.set(index, color);
    }
    matrix.flush().await
}
