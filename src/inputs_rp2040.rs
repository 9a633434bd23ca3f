use embassy_rp::adc::{self, Adc, Channel};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Timer;

use crate::encoder::{classify, RawEncoder, ENCODER_EVENT};

/// ADC and the divider pin, shared between the watch task and the decoder.
pub type EncoderAdc = Mutex<CriticalSectionRawMutex, (Adc<'static, adc::Async>, Channel<'static>)>;

/// Sample cadence of the watch task, ms.
const WATCH_INTERVAL_MS: u64 = 1;

pub struct AdcEncoder {
    adc: &'static EncoderAdc,
}

impl AdcEncoder {
    pub fn new(adc: &'static EncoderAdc) -> Self {
        Self { adc }
    }
}

impl RawEncoder for AdcEncoder {
    async fn sample(&mut self) -> u16 {
        let mut guard = self.adc.lock().await;
        let (adc, pin) = &mut *guard;
        // 12-bit conversion scaled down to the 10-bit calibration range; a
        // failed conversion reads as rest.
        adc.read(pin).await.map(|raw| raw >> 2).unwrap_or(0)
    }
}

/// Stands in for the pin-change interrupt: flags any band change on the
/// divider so the decoder wakes up. Does nothing else.
#[embassy_executor::task]
pub async fn encoder_watch_task(adc: &'static EncoderAdc) -> ! {
    let mut sampler = AdcEncoder::new(adc);
    let mut last = classify(sampler.sample().await);
    loop {
        let band = classify(sampler.sample().await);
        if band != last {
            ENCODER_EVENT.set();
            last = band;
        }
        Timer::after_millis(WATCH_INTERVAL_MS).await;
    }
}
