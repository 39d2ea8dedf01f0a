use defmt::trace;
use embassy_futures::yield_now;
use esp_hal::{
    analog::adc::{Adc, AdcPin},
    gpio::GpioPin,
    peripherals::ADC1,
    Blocking,
};
use mic_dsp::{AdcDma, DataSize, TransferConfig};

use crate::config::MIC_ADC;

/// Readings taken between two yields.
const READS_PER_YIELD: usize = 16;
/// Width of a raw ESP32-S3 SAR reading.
const NATIVE_BITS: u32 = 12;

pub type MicPin = AdcPin<GpioPin<4>, ADC1>;

// GPIO4 is ADC1 channel 3; keep `MIC_ADC` in step with `MicPin`.
const _: () = assert!(MIC_ADC.gpio == 4 && MIC_ADC.channel == 3);

/// ADC1 with the microphone pin, filling windows from polled one-shot reads.
///
/// The ESP32-S3 HAL has no FIFO-to-memory DMA path for the SAR ADC, so the
/// transfer is performed by the future itself: each poll moves finished
/// conversions into the window. Writes only happen while the future is
/// polled, so dropping it stops the transfer. A conversion started by a
/// dropped transfer is remembered in `in_flight` and skipped by the next one.
pub struct EspAdcChannel {
    adc: Adc<'static, ADC1, Blocking>,
    pin: MicPin,
    running: bool,
    in_flight: bool,
}

impl EspAdcChannel {
    pub fn new(adc: Adc<'static, ADC1, Blocking>, pin: MicPin) -> Self {
        Self {
            adc,
            pin,
            running: false,
            in_flight: false,
        }
    }

    fn poll_reading(&mut self) -> nb::Result<u16, ()> {
        self.in_flight = true;
        let result = self.adc.read_oneshot(&mut self.pin);
        if !matches!(result, Err(nb::Error::WouldBlock)) {
            self.in_flight = false;
        }
        result
    }
}

fn store(config: &TransferConfig, code: u16) -> u16 {
    match config.data_size {
        DataSize::Byte => code >> (NATIVE_BITS - 8),
        DataSize::HalfWord => code,
    }
}

impl AdcDma for EspAdcChannel {
    fn drain_fifo(&mut self) {
        // One look only: a read with nothing in flight would start a conversion.
        if self.in_flight {
            let _ = self.poll_reading();
        }
    }

    fn set_running(&mut self, running: bool) {
        if self.running != running {
            trace!("ADC running: {}", running);
        }
        self.running = running;
    }

    async fn transfer(&mut self, config: &TransferConfig, dest: &mut [u16]) -> usize {
        self.set_running(true);

        while self.in_flight {
            if let Err(nb::Error::WouldBlock) = self.poll_reading() {
                yield_now().await;
            }
        }

        let mut written = 0;
        for slot in dest.iter_mut() {
            let code = loop {
                match self.poll_reading() {
                    Ok(code) => break code,
                    Err(nb::Error::WouldBlock) => yield_now().await,
                    Err(nb::Error::Other(())) => return written,
                }
            };
            *slot = store(config, code);
            written += 1;
            if written % READS_PER_YIELD == 0 {
                yield_now().await;
            }
        }
        written
    }
}
