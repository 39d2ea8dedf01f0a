#![no_std]

//! Acquisition and loudness classification for an ADC-sampled microphone.
//!
//! The pipeline is `Sampler::acquire` -> `power::estimate` -> `intensity::classify`.

pub mod error;
pub mod intensity;
pub mod power;
pub mod report;
pub mod sampler;

pub use error::Error;
pub use intensity::{classify, IntensityLevel};
pub use power::{estimate, rms, AdcScale, Measurement, PowerEstimate};
pub use report::status_line;
pub use sampler::{AdcConfig, AdcDma, DataSize, SampleWindow, Sampler, TransferConfig};

/// Number of ADC readings in one acquisition window.
pub const SAMPLES: usize = 200;
