use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
    encoder: EncoderResources {
        adc: ADC,
        pin: PIN_26,
    },
    outputs: OutputResources {
        beeper: PIN_11,
        heater: PIN_12,
    },
    sensor: SensorResources {
        pin: PIN_2,
    },
    i2c: I2cResources {
        i2c: I2C0,
        sda: PIN_20,
        scl: PIN_21,
    },
}
