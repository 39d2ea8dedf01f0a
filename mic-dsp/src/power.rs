#[allow(unused_imports)]
use micromath::F32Ext;

use crate::sampler::SampleWindow;

/// Affine mapping from raw ADC codes to volts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub struct AdcScale {
    pub full_scale_volts: f32,
    pub bits: u32,
    /// DC bias of the microphone output, subtracted after conversion.
    pub midpoint_volts: f32,
}

impl AdcScale {
    /// 12-bit converter over 0..3.3 V with the microphone biased at half supply.
    pub const DEFAULT: Self = Self::new(3.3, 12);

    pub const fn new(full_scale_volts: f32, bits: u32) -> Self {
        Self {
            full_scale_volts,
            bits,
            midpoint_volts: full_scale_volts / 2.0,
        }
    }

    pub fn max_code(&self) -> u16 {
        ((1u32 << self.bits) - 1) as u16
    }

    /// Width of a code span in volts, without the bias offset.
    pub fn span_to_volts(&self, code: f32) -> f32 {
        code * self.full_scale_volts / (1u32 << self.bits) as f32
    }

    pub fn to_volts(&self, code: f32) -> f32 {
        self.span_to_volts(code) - self.midpoint_volts
    }

    /// Rectified distance from the bias, doubled to span `0..full_scale`.
    ///
    /// An RMS under one code step means the converter never saw the bias
    /// (floating input or no readings), so it reads as silence.
    pub fn loudness(&self, code: f32) -> f32 {
        if code < 1.0 {
            return 0.0;
        }
        2.0 * self.to_volts(code).abs()
    }
}

impl Default for AdcScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Root mean square of raw codes, in code units.
pub fn rms(samples: &[u16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_of_squares: u64 = samples
        .iter()
        .map(|&s| u64::from(s) * u64::from(s))
        .sum();
    libm::sqrt(sum_of_squares as f64 / samples.len() as f64) as f32
}

/// RMS of the samples after removing their mean, in code units.
pub fn ac_rms(samples: &[u16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&s| {
            let d = f64::from(s) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    libm::sqrt(variance) as f32
}

/// RMS of a full acquisition window.
pub fn estimate(window: &SampleWindow) -> f32 {
    rms(window)
}

/// How a window is reduced to a loudness in volts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum PowerEstimate {
    /// RMS of the raw biased codes, normalized with `AdcScale::loudness`.
    #[default]
    Rms,
    /// RMS with the window mean removed first, doubled to span `0..full_scale`.
    AcRms,
}

/// Raw-code RMS of a window and the loudness derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub struct Measurement {
    pub rms: f32,
    /// Volts.
    pub loudness: f32,
}

impl PowerEstimate {
    pub fn measure(&self, samples: &[u16], scale: &AdcScale) -> Measurement {
        let rms = rms(samples);
        let loudness = match *self {
            PowerEstimate::Rms => scale.loudness(rms),
            PowerEstimate::AcRms => 2.0 * scale.span_to_volts(ac_rms(samples)),
        };
        Measurement { rms, loudness }
    }

    pub fn loudness(&self, samples: &[u16], scale: &AdcScale) -> f32 {
        self.measure(samples, scale).loudness
    }
}
