#![no_std]

pub mod adc_channel;
pub mod config;
