use embassy_time::{Instant, Timer};
use portable_atomic::Ordering;

use crate::outputs_std::HEATER_DRIVE;
use crate::{SensorError, TemperatureSensor};

// Thermal model parameters, in millidegrees to keep the integration integer.
const AMBIENT_MILLI_C: i32 = 25_000;
// Chamber ramp with the SSR closed.
const HEAT_RATE_MILLI_C_PER_S: i32 = 400;
// Newtonian leak to ambient, per second per whole degree of difference.
const LOSS_MILLI_C_PER_S_PER_C: i32 = 6;

/// First-order simulation of the drying chamber. Follows the shared SSR
/// drive so the control loop sees a plant that actually responds to it.
pub struct MockSensor {
    temp_milli_c: i32,
    last_update: Instant,
}

impl MockSensor {
    pub fn new() -> Self {
        Self {
            temp_milli_c: AMBIENT_MILLI_C,
            last_update: Instant::now(),
        }
    }
}

impl TemperatureSensor for MockSensor {
    async fn read(&mut self) -> Result<i16, SensorError> {
        // The real probe needs most of a second per conversion; keeping the
        // wait here keeps the control loop honestly paced.
        Timer::after_millis(250).await;

        let dt_ms = self.last_update.elapsed().as_millis() as i32;
        self.last_update = Instant::now();

        let heat = if HEATER_DRIVE.load(Ordering::Acquire) {
            HEAT_RATE_MILLI_C_PER_S
        } else {
            0
        };
        let loss = (self.temp_milli_c - AMBIENT_MILLI_C) / 1000 * LOSS_MILLI_C_PER_S_PER_C;
        self.temp_milli_c += (heat - loss) * dt_ms / 1000;
        if self.temp_milli_c < AMBIENT_MILLI_C {
            self.temp_milli_c = AMBIENT_MILLI_C;
        }

        Ok((self.temp_milli_c / 1000) as i16)
    }
}
