#![no_std]
#![no_main]

use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::Delay;
use esp_backtrace as _;
use esp_hal::{
    analog::adc::{Adc, AdcConfig as EspAdcConfig, Attenuation},
    clock::CpuClock,
    spi::{
        master::{Config as SpiConfig, Spi},
        Mode,
    },
    time::Rate,
    timer::timg::TimerGroup,
    Async,
};
use mic_dsp::{status_line, Error, Sampler, TransferConfig, SAMPLES};
use mic_viz::{ws2812, MeterError, VuMeter, Ws2812Spi};
use static_cell::StaticCell;
use vumatrix::{
    adc_channel::EspAdcChannel,
    config::{LED_GPIO, MIC_ADC},
};

// The SPI MOSI below is wired to GPIO7.
const _: () = assert!(LED_GPIO == 7);

static MIC_CHANNEL: StaticCell<EspAdcChannel> = StaticCell::new();

type Leds = Ws2812Spi<Spi<'static, Async>>;

#[embassy_executor::task]
async fn vu_meter(channel: &'static mut EspAdcChannel, transfer: TransferConfig, leds: Leds) {
    info!("Starting vu_meter task");

    let timeout_us = MIC_ADC.default_timeout_us(SAMPLES);
    info!("Acquisition timeout {} us", timeout_us);
    let sampler = Sampler::new(channel, transfer, timeout_us);
    let mut meter = VuMeter::new(sampler, Delay, leds).with_scale(MIC_ADC.scale());

    info!("Test sampling...");
    if let Err(e) = meter.start().await {
        warn!("Startup sampling failed: {:?}", defmt::Debug2Format(&e));
    }
    info!("Configuration complete, entering loop");

    loop {
        match meter.tick().await {
            Ok(reading) => esp_println::print!("{}", status_line(reading.level, reading.loudness)),
            Err(MeterError::Acquisition(e)) => warn!("Cycle skipped: {}", e),
            Err(MeterError::Display(e)) => error!("LED update failed: {:?}", e),
        }
    }
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    info!("Init!");

    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    info!("Preparing LED matrix on GPIO{}", LED_GPIO);
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_khz(ws2812::SPI_FREQUENCY_KHZ))
            .with_mode(Mode::_0),
    )
    .map_err(|_| Error::PeripheralInit { resource: "SPI2" })
    .unwrap_or_else(|e| fatal(e))
    .with_mosi(peripherals.GPIO7)
    .into_async();

    info!("Preparing ADC channel {} on GPIO{}", MIC_ADC.channel, MIC_ADC.gpio);
    let mut adc_config = EspAdcConfig::new();
    let pin = adc_config.enable_pin(peripherals.GPIO4, Attenuation::_11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config);
    let transfer = MIC_ADC.transfer_config();
    transfer.check().unwrap_or_else(|e| fatal(e));
    let channel = MIC_CHANNEL.init(EspAdcChannel::new(adc, pin));
    info!("ADC configured");

    spawner.must_spawn(vu_meter(channel, transfer, Ws2812Spi::new(spi)));
}

/// Bring-up failures leave nothing to drive; report and halt.
fn fatal(e: Error) -> ! {
    error!("{}", e);
    panic!("peripheral bring-up failed");
}
