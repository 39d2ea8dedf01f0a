use core::ops::Deref;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;

#[cfg(feature = "logging")]
use defmt::{trace, warn};

use crate::error::{Error, Result};
use crate::power::AdcScale;
use crate::SAMPLES;

/// Timeout is this many times the nominal window duration.
const TIMEOUT_FACTOR: u32 = 4;
const MIN_TIMEOUT_US: u32 = 1_000;

/// Width of one transfer-engine write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum DataSize {
    /// Readings shifted down to 8 bits by the converter.
    Byte,
    /// Full-resolution readings.
    HalfWord,
}

impl DataSize {
    pub const fn bits(self) -> u32 {
        match self {
            DataSize::Byte => 8,
            DataSize::HalfWord => 16,
        }
    }
}

/// Descriptor of the acquisition channel, fixed after startup.
///
/// Writes are always paced by the ADC: one write per reading pushed into its
/// queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub struct TransferConfig {
    pub data_size: DataSize,
    pub read_increment: bool,
    pub write_increment: bool,
}

impl TransferConfig {
    /// 16-bit reads from the fixed FIFO register into an incrementing buffer.
    pub const ADC_FIFO: Self = Self {
        data_size: DataSize::HalfWord,
        read_increment: false,
        write_increment: true,
    };

    /// A window is filled from one result register into consecutive slots.
    /// Any other shape is rejected at bring-up.
    pub fn check(&self) -> Result<()> {
        if self.read_increment || !self.write_increment {
            return Err(Error::PeripheralInit {
                resource: "ADC transfer descriptor",
            });
        }
        Ok(())
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::ADC_FIFO
    }
}

/// One-time ADC setup applied during bring-up.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub struct AdcConfig {
    pub channel: u8,
    pub gpio: u8,
    /// Extra clock cycles between two readings.
    pub clock_div: f32,
    /// Clock the divider applies to.
    pub base_clock_hz: u32,
    /// Keep only the top 8 bits of each reading.
    pub shift_to_8bit: bool,
}

impl AdcConfig {
    pub const DEFAULT: Self = Self {
        channel: 2,
        gpio: 28,
        clock_div: 96.0,
        base_clock_hz: 48_000_000,
        shift_to_8bit: false,
    };

    /// Bits in one stored reading.
    pub const fn resolution_bits(&self) -> u32 {
        if self.shift_to_8bit {
            8
        } else {
            12
        }
    }

    /// Code-to-volts mapping for readings produced with this setup.
    pub const fn scale(&self) -> AdcScale {
        AdcScale::new(3.3, self.resolution_bits())
    }

    /// Transfer descriptor matching the stored reading width.
    pub const fn transfer_config(&self) -> TransferConfig {
        TransferConfig {
            data_size: if self.shift_to_8bit {
                DataSize::Byte
            } else {
                DataSize::HalfWord
            },
            ..TransferConfig::ADC_FIFO
        }
    }

    /// ADC clock cycles between two consecutive readings.
    pub fn sample_period_cycles(&self) -> u32 {
        1 + self.clock_div as u32
    }

    /// Nominal time to fill `samples` readings, rounded up to whole microseconds.
    pub fn window_duration_us(&self, samples: usize) -> u32 {
        let cycles = samples as u64 * self.sample_period_cycles() as u64;
        (cycles * 1_000_000).div_ceil(self.base_clock_hz as u64) as u32
    }

    pub fn default_timeout_us(&self, samples: usize) -> u32 {
        self.window_duration_us(samples)
            .saturating_mul(TIMEOUT_FACTOR)
            .max(MIN_TIMEOUT_US)
    }
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// ADC peripheral and its transfer channel, claimed once as a single handle.
#[allow(async_fn_in_trait)]
pub trait AdcDma {
    /// Discard any readings still queued in the ADC FIFO.
    ///
    /// Runs before the acquisition deadline starts, so it must not wait on
    /// the converter. A reading still in flight is for `transfer` to skip.
    fn drain_fifo(&mut self);

    /// Start or stop free-running conversions. Idempotent.
    fn set_running(&mut self, running: bool);

    /// Arm the transfer engine with `dest` as destination and `dest.len()` as
    /// count, start conversions, and resolve with the number of completed
    /// writes.
    ///
    /// Dropping the returned future before it resolves must abort the
    /// transfer so that `dest` is no longer written.
    async fn transfer(&mut self, config: &TransferConfig, dest: &mut [u16]) -> usize;
}

/// Fixed-length window of raw ADC codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleWindow {
    samples: [u16; SAMPLES],
}

impl SampleWindow {
    pub const fn new() -> Self {
        Self {
            samples: [0; SAMPLES],
        }
    }

    pub const fn from_samples(samples: [u16; SAMPLES]) -> Self {
        Self { samples }
    }

    /// A window where every reading is `code`.
    pub const fn filled(code: u16) -> Self {
        Self {
            samples: [code; SAMPLES],
        }
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SampleWindow {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.samples
    }
}

/// Blocking acquisition of one `SampleWindow` per call.
pub struct Sampler<'r, C: AdcDma> {
    channel: &'r mut C,
    config: TransferConfig,
    window: SampleWindow,
    timeout_us: u32,
}

impl<'r, C: AdcDma> Sampler<'r, C> {
    pub fn new(channel: &'r mut C, config: TransferConfig, timeout_us: u32) -> Self {
        Self {
            channel,
            config,
            window: SampleWindow::new(),
            timeout_us,
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn timeout_us(&self) -> u32 {
        self.timeout_us
    }

    /// Fill the window with `SAMPLES` fresh readings.
    ///
    /// The ADC is stopped again before this returns, whatever the outcome.
    /// The window is only handed out when every slot was written by this
    /// acquisition.
    pub async fn acquire<D: DelayNs>(&mut self, delay: &mut D) -> Result<&SampleWindow> {
        self.channel.drain_fifo();
        self.channel.set_running(false);

        let outcome = select(
            self.channel.transfer(&self.config, &mut self.window.samples),
            delay.delay_us(self.timeout_us),
        )
        .await;

        self.channel.set_running(false);

        match outcome {
            Either::First(SAMPLES) => {
                #[cfg(feature = "logging")]
                trace!("acquired {} samples", SAMPLES);
                Ok(&self.window)
            }
            Either::First(written) => {
                #[cfg(feature = "logging")]
                warn!("transfer stopped after {} of {} samples", written, SAMPLES);
                Err(Error::IncompleteTransfer {
                    written,
                    expected: SAMPLES,
                })
            }
            Either::Second(()) => {
                #[cfg(feature = "logging")]
                warn!("transfer timed out after {} us", self.timeout_us);
                Err(Error::AcquisitionTimeout {
                    waited_us: self.timeout_us,
                })
            }
        }
    }

    /// Throwaway acquisition so the first real cycle does not see power-on data.
    pub async fn prime<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.acquire(delay).await.map(|_| ())
    }
}
