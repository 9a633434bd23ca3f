use embassy_time::Timer;
use portable_atomic::{AtomicU16, Ordering};

use crate::encoder::{EventFlag, RawEncoder, ENCODER_EVENT};

/// Divider levels matching the band calibration in `encoder`.
pub const REST_LEVEL: u16 = 0;
pub const PREV_LEVEL: u16 = 845;
pub const NEXT_LEVEL: u16 = 697;
pub const CONFIRM_LEVEL: u16 = 580;

/// Contact-closure dwell for each simulated phase, ms.
const PHASE_MS: u64 = 40;

/// Current "voltage" on the simulated divider.
pub struct SimLevel(AtomicU16);

impl SimLevel {
    pub const fn new() -> Self {
        Self(AtomicU16::new(REST_LEVEL))
    }

    pub fn set(&self, value: u16) {
        self.0.store(value, Ordering::Release);
    }

    pub fn get(&self) -> u16 {
        self.0.load(Ordering::Acquire)
    }
}

pub static SIM_LEVEL: SimLevel = SimLevel::new();

/// Decoder-side view of the simulated divider.
pub struct SimEncoder<'a> {
    level: &'a SimLevel,
}

impl<'a> SimEncoder<'a> {
    pub fn new(level: &'a SimLevel) -> Self {
        Self { level }
    }
}

impl RawEncoder for SimEncoder<'_> {
    async fn sample(&mut self) -> u16 {
        self.level.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    RotateNext,
    RotatePrev,
    Press,
}

/// Drive one gesture's waveform onto the divider, firing the change event at
/// every level step the way the pin-change interrupt would.
pub async fn play_gesture(level: &SimLevel, event: &EventFlag, gesture: Gesture) {
    let phases: &[u16] = match gesture {
        // A rotation closes one contact, then the other while the first is
        // still down: two bands back to back.
        Gesture::RotateNext => &[NEXT_LEVEL, PREV_LEVEL],
        Gesture::RotatePrev => &[PREV_LEVEL, NEXT_LEVEL],
        Gesture::Press => &[CONFIRM_LEVEL],
    };
    for &value in phases {
        level.set(value);
        event.set();
        Timer::after_millis(PHASE_MS).await;
    }
    level.set(REST_LEVEL);
    event.set();
}

/// Canned operator for the demo binary: picks the second catalog entry, then
/// keeps confirming whenever a finished session asks for the knob.
#[embassy_executor::task]
pub async fn demo_user_task() -> ! {
    Timer::after_secs(2).await;
    play_gesture(&SIM_LEVEL, &ENCODER_EVENT, Gesture::RotateNext).await;
    Timer::after_millis(500).await;
    play_gesture(&SIM_LEVEL, &ENCODER_EVENT, Gesture::Press).await;

    loop {
        Timer::after_secs(30).await;
        play_gesture(&SIM_LEVEL, &ENCODER_EVENT, Gesture::Press).await;
    }
}
