use embassy_time::Timer;

/// Single binary sounder.
pub trait Beeper {
    fn set(&mut self, on: bool);
}

/// Morse base unit, ms.
pub const DOT_MS: u64 = 500;
const DASH_MS: u64 = 3 * DOT_MS;
const SIGN_GAP_MS: u64 = DOT_MS;
const LETTER_GAP_MS: u64 = 3 * DOT_MS;
/// Silence between repeats of the whole distress pattern, ms.
pub const REPEAT_GAP_MS: u64 = 7 * DOT_MS;

/// Sounder on for `on_ms`, then silent for `gap_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub on_ms: u64,
    pub gap_ms: u64,
}

const fn dot(gap_ms: u64) -> Pulse {
    Pulse {
        on_ms: DOT_MS,
        gap_ms,
    }
}

const fn dash(gap_ms: u64) -> Pulse {
    Pulse {
        on_ms: DASH_MS,
        gap_ms,
    }
}

/// S.O.S, the international distress signature.
pub const DISTRESS_PATTERN: [Pulse; 9] = [
    dot(SIGN_GAP_MS),
    dot(SIGN_GAP_MS),
    dot(LETTER_GAP_MS),
    dash(SIGN_GAP_MS),
    dash(SIGN_GAP_MS),
    dash(LETTER_GAP_MS),
    dot(SIGN_GAP_MS),
    dot(SIGN_GAP_MS),
    dot(LETTER_GAP_MS),
];

pub async fn beep<B: Beeper>(beeper: &mut B, duration_ms: u64) {
    beeper.set(true);
    Timer::after_millis(duration_ms).await;
    beeper.set(false);
}

/// Short confirmation at power-on.
pub async fn startup_chirp<B: Beeper>(beeper: &mut B) {
    beep(beeper, 250).await;
}

/// Three long pulses when a session finishes.
pub async fn completion_signal<B: Beeper>(beeper: &mut B) {
    beep(beeper, 2000).await;
    Timer::after_millis(1000).await;
    beep(beeper, 2000).await;
    Timer::after_millis(1000).await;
    beep(beeper, 2000).await;
}

/// Repeat the distress signature until the board is physically reset.
pub async fn distress_loop<B: Beeper>(beeper: &mut B) -> ! {
    loop {
        for pulse in &DISTRESS_PATTERN {
            beep(beeper, pulse.on_ms).await;
            Timer::after_millis(pulse.gap_ms).await;
        }
        Timer::after_millis(REPEAT_GAP_MS).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distress_pattern_spells_sos() {
        let lengths: [u64; 9] = core::array::from_fn(|i| DISTRESS_PATTERN[i].on_ms);
        assert_eq!(
            lengths,
            [
                DOT_MS, DOT_MS, DOT_MS, DASH_MS, DASH_MS, DASH_MS, DOT_MS, DOT_MS, DOT_MS
            ]
        );
    }

    #[test]
    fn distress_gaps_follow_morse_spacing() {
        for (i, pulse) in DISTRESS_PATTERN.iter().enumerate() {
            let expected = if i % 3 == 2 { LETTER_GAP_MS } else { SIGN_GAP_MS };
            assert_eq!(pulse.gap_ms, expected);
        }
        assert_eq!(SIGN_GAP_MS, DOT_MS);
        assert_eq!(LETTER_GAP_MS, 3 * DOT_MS);
        assert_eq!(REPEAT_GAP_MS, 7 * DOT_MS);
    }
}
