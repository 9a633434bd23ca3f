use portable_atomic::{AtomicBool, Ordering};

use crate::alarm::Beeper;
use crate::log::*;
use crate::Heater;

/// Mirror of the SSR drive, read by the thermal simulation.
pub static HEATER_DRIVE: AtomicBool = AtomicBool::new(false);

/// SSR stand-in: latches the shared flag for the simulated plant.
pub struct SimHeater;

impl Heater for SimHeater {
    fn set(&mut self, on: bool) {
        if HEATER_DRIVE.swap(on, Ordering::AcqRel) != on {
            info!("heater {}", if on { "on" } else { "off" });
        }
    }
}

pub struct SimBeeper;

impl Beeper for SimBeeper {
    fn set(&mut self, on: bool) {
        debug!("beeper {}", if on { "on" } else { "off" });
    }
}
