#![no_std]

//! Bar-graph rendering of loudness levels on a 25-pixel LED matrix.

pub mod frame;
pub mod matrix;
pub mod meter;
pub mod tiers;
pub mod ws2812;

pub use frame::{LedFrame, LED_COUNT};
pub use matrix::{present, LedMatrix};
pub use meter::{MeterError, Reading, VuMeter};
pub use tiers::{render, Tier, TIERS};
pub use ws2812::Ws2812Spi;
