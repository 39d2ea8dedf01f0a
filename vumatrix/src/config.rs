use mic_dsp::AdcConfig;

// --- Microphone ---
/// GPIO4 is ADC1 channel 3 on the ESP32-S3.
///
/// Polled one-shot reads with task yields land near 40k readings per second,
/// modelled here as 25 ticks of a 1 MHz clock per reading. The acquisition
/// deadline is derived from this pacing.
pub const MIC_ADC: AdcConfig = AdcConfig {
    channel: 3,
    gpio: 4,
    clock_div: 24.0,
    base_clock_hz: 1_000_000,
    shift_to_8bit: false,
};

// --- LED matrix ---
/// WS2812 data line, driven by SPI2 MOSI.
pub const LED_GPIO: u8 = 7;
