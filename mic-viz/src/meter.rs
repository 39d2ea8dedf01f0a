use embedded_hal_async::delay::DelayNs;
use mic_dsp::{classify, AdcDma, AdcScale, IntensityLevel, Measurement, PowerEstimate, Sampler};
use thiserror::Error;

#[cfg(feature = "logging")]
use defmt::debug;

use crate::frame::LedFrame;
use crate::matrix::{present, LedMatrix};
use crate::tiers::render;

/// Outcome of one successful cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub struct Reading {
    pub level: IntensityLevel,
    /// Volts, after normalization.
    pub loudness: f32,
    /// Raw-code RMS of the window.
    pub rms: f32,
}

#[derive(Debug, Error)]
pub enum MeterError<E> {
    #[error("acquisition failed: {0}")]
    Acquisition(#[from] mic_dsp::Error),
    #[error("LED matrix update failed")]
    Display(E),
}

/// Sample, classify, and display, one cycle per `tick`.
pub struct VuMeter<'r, C: AdcDma, D: DelayNs, M: LedMatrix> {
    sampler: Sampler<'r, C>,
    delay: D,
    matrix: M,
    scale: AdcScale,
    estimate: PowerEstimate,
    frame: LedFrame,
}

impl<'r, C, D, M> VuMeter<'r, C, D, M>
where
    C: AdcDma,
    D: DelayNs,
    M: LedMatrix,
{
    pub fn new(sampler: Sampler<'r, C>, delay: D, matrix: M) -> Self {
        Self {
            sampler,
            delay,
            matrix,
            scale: AdcScale::DEFAULT,
            estimate: PowerEstimate::default(),
            frame: LedFrame::dark(),
        }
    }

    pub fn with_scale(mut self, scale: AdcScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_estimate(mut self, estimate: PowerEstimate) -> Self {
        self.estimate = estimate;
        self
    }

    /// Blank the matrix and run one throwaway acquisition.
    pub async fn start(&mut self) -> Result<(), MeterError<M::Error>> {
        self.matrix.init().await.map_err(MeterError::Display)?;
        self.frame = LedFrame::dark();
        self.sampler.prime(&mut self.delay).await?;
        Ok(())
    }

    /// One pass of the pipeline.
    ///
    /// When acquisition fails the matrix is not touched and keeps showing the
    /// previous frame.
    pub async fn tick(&mut self) -> Result<Reading, MeterError<M::Error>> {
        let window = self.sampler.acquire(&mut self.delay).await?;
        let Measurement { rms, loudness } = self.estimate.measure(window, &self.scale);
        let level = classify(loudness);

        let frame = render(level);
        present(&frame, &mut self.matrix)
            .await
            .map_err(MeterError::Display)?;
        self.frame = frame;

        #[cfg(feature = "logging")]
        debug!("rms {} loudness {} level {}", rms, loudness, level);

        Ok(Reading {
            level,
            loudness,
            rms,
        })
    }

    /// Last frame handed to the matrix.
    pub fn frame(&self) -> &LedFrame {
        &self.frame
    }

    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut M {
        &mut self.matrix
    }
}
