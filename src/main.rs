#![no_std]
#![no_main]

use defmt::*;
use dryer_controller::clock::{tick_task, CLOCK};
use dryer_controller::dryer_controller::Dryer;
use dryer_controller::encoder::{EncoderDecoder, ENCODER_EVENT};
use dryer_controller::inputs::{encoder_watch_task, AdcEncoder, EncoderAdc};
use dryer_controller::lcd1602::{Lcd1602, LCD_I2C_ADDR};
use dryer_controller::outputs::{GpioBeeper, SsrHeater};
use dryer_controller::resources::*;
use dryer_controller::split_resources;
use dryer_controller::temperature_sensor::Ds18b20;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Flex, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

embassy_rp::bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    let adc = Adc::new(r.encoder.adc, Irqs, adc::Config::default());
    let pin = Channel::new_pin(r.encoder.pin, Pull::None);
    static ENCODER_ADC: StaticCell<EncoderAdc> = StaticCell::new();
    let encoder_adc = ENCODER_ADC.init(Mutex::new((adc, pin)));

    let i2c = I2c::new_async(r.i2c.i2c, r.i2c.scl, r.i2c.sda, Irqs, i2c::Config::default());
    let mut lcd = Lcd1602::new(i2c, LCD_I2C_ADDR);
    if lcd.init().await.is_err() {
        warn!("display init failed");
    }

    unwrap!(spawner.spawn(tick_task()));
    unwrap!(spawner.spawn(encoder_watch_task(encoder_adc)));

    let mut dryer = Dryer::new(
        EncoderDecoder::new(AdcEncoder::new(encoder_adc), &ENCODER_EVENT),
        Ds18b20::new(Flex::new(r.sensor.pin)),
        SsrHeater::new(Output::new(r.outputs.heater, Level::Low)),
        lcd,
        GpioBeeper::new(Output::new(r.outputs.beeper, Level::Low)),
        &CLOCK,
    );
    dryer.startup().await;
    dryer.run().await
}
