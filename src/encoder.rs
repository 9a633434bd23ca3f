use core::ops::Range;

use embassy_time::{Duration, Instant, Timer};
use portable_atomic::{AtomicBool, Ordering};

/// Discrete action recovered from one physical encoder gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Next,
    Prev,
    Confirm,
}

/// Residual contact-bounce allowance, ms.
pub const ENCODER_JITTER_MS: u64 = 5;
/// How long to wait for the second contact of a rotation, ms.
pub const ENCODER_TIMEOUT_MS: u64 = 350;
/// Sleep between samples while polling, ms.
pub const POLL_INTERVAL_MS: u64 = 1;

// Voltage-divider bands for the 10-bit reading, calibrated empirically for
// the schematic's resistor values at 1% tolerance. Anything outside the
// bands reads as rest.
const PREV_BAND: Range<u16> = 841..850;
const NEXT_BAND: Range<u16> = 691..705;
const CONFIRM_BAND: Range<u16> = 561..610;

/// Map one raw sample onto its symbolic band.
pub fn classify(sample: u16) -> Action {
    if PREV_BAND.contains(&sample) {
        Action::Prev
    } else if NEXT_BAND.contains(&sample) {
        Action::Next
    } else if CONFIRM_BAND.contains(&sample) {
        Action::Confirm
    } else {
        Action::None
    }
}

/// Pending-event flag set by the platform's edge source whenever the divider
/// voltage moves. Stands in for the pin-change interrupt.
pub struct EventFlag(AtomicBool);

impl EventFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

pub static ENCODER_EVENT: EventFlag = EventFlag::new();

/// Raw sample source for the decoder, 10-bit range.
#[allow(async_fn_in_trait)]
pub trait RawEncoder {
    async fn sample(&mut self) -> u16;
}

pub struct EncoderDecoder<'a, R> {
    raw: R,
    event: &'a EventFlag,
}

impl<'a, R: RawEncoder> EncoderDecoder<'a, R> {
    pub fn new(raw: R, event: &'a EventFlag) -> Self {
        Self { raw, event }
    }

    /// Block until exactly one clean action resolves.
    ///
    /// The two direction contacts of the encoder close in sequence and the
    /// divider gives each closure its own band, so a rotation arrives as one
    /// band followed by its complement. Bounce or a slow conversion can
    /// swallow the second closure, hence the bounded wait for it.
    pub async fn wait_for_action(&mut self) -> Action {
        while !self.event.is_set() {
            Timer::after_millis(POLL_INTERVAL_MS).await;
        }

        let action = classify(self.raw.sample().await);

        // Spurious wake-up: the voltage is already back at rest. The flag is
        // left for the next call; one poll sleep keeps the caller's retry
        // loop from spinning.
        if action == Action::None {
            Timer::after_millis(POLL_INTERVAL_MS).await;
            return Action::None;
        }

        let begin = Instant::now();

        let complement = match action {
            Action::Prev => Some(Action::Next),
            Action::Next => Some(Action::Prev),
            _ => None,
        };
        if let Some(complement) = complement {
            loop {
                if classify(self.raw.sample().await) == complement {
                    break;
                }
                Timer::after_millis(POLL_INTERVAL_MS).await;
                if begin.elapsed() >= Duration::from_millis(ENCODER_TIMEOUT_MS) {
                    // Fast or partial rotation: accept the first band as-is.
                    break;
                }
            }
        }

        // Wait for the voltage to fall back to rest; for a press this is the
        // button release.
        while classify(self.raw.sample().await) != Action::None {
            Timer::after_millis(POLL_INTERVAL_MS).await;
        }

        // Settle long enough that residual bounce from this gesture cannot
        // read as a second one: twice the gesture length for a rotation, the
        // jitter allowance alone for a press.
        let gesture_ms = if action == Action::Confirm {
            0
        } else {
            begin.elapsed().as_millis()
        };
        Timer::after_millis(gesture_ms * 2 + ENCODER_JITTER_MS).await;

        // The gesture may have re-fired the edge source many times over; all
        // of that collapses into the one action returned here.
        self.event.clear();

        action
    }
}
