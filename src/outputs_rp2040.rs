use embassy_rp::gpio::Output;

use crate::alarm::Beeper;
use crate::Heater;

/// Solid-state relay behind one GPIO.
pub struct SsrHeater {
    pin: Output<'static>,
}

impl SsrHeater {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl Heater for SsrHeater {
    fn set(&mut self, on: bool) {
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

pub struct GpioBeeper {
    pin: Output<'static>,
}

impl GpioBeeper {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl Beeper for GpioBeeper {
    fn set(&mut self, on: bool) {
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
