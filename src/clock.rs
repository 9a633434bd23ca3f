use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Timer;

#[derive(Debug, Clone, Copy)]
struct TickState {
    seconds: u32,
    display_stale: bool,
}

/// Elapsed-time state shared between the 1 Hz tick task and the control loop.
///
/// The counter and the repaint flag move together: every multi-field
/// read-reset sequence runs under one critical section so a tick firing
/// mid-update cannot tear the pair.
pub struct Clock {
    state: Mutex<CriticalSectionRawMutex, Cell<TickState>>,
}

impl Clock {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(TickState {
                seconds: 0,
                display_stale: false,
            })),
        }
    }

    /// One elapsed second: bump the counter and schedule a repaint.
    pub fn tick(&self) {
        self.state.lock(|s| {
            let mut v = s.get();
            v.seconds = v.seconds.wrapping_add(1);
            v.display_stale = true;
            s.set(v);
        });
    }

    /// Seconds since the current stage began.
    pub fn seconds(&self) -> u32 {
        self.state.lock(|s| s.get().seconds)
    }

    /// Zero the counter and drop any pending repaint, atomically.
    pub fn reset(&self) {
        self.state.lock(|s| {
            s.set(TickState {
                seconds: 0,
                display_stale: false,
            })
        });
    }

    /// Force a repaint on the next control cycle.
    pub fn mark_stale(&self) {
        self.state.lock(|s| {
            let mut v = s.get();
            v.display_stale = true;
            s.set(v);
        });
    }

    /// True at most once per tick: consumes the repaint flag.
    pub fn take_stale(&self) -> bool {
        self.state.lock(|s| {
            let mut v = s.get();
            let stale = v.display_stale;
            v.display_stale = false;
            s.set(v);
            stale
        })
    }
}

pub static CLOCK: Clock = Clock::new();

/// 1 Hz heartbeat, the only writer that advances session time.
#[embassy_executor::task]
pub async fn tick_task() -> ! {
    loop {
        Timer::after_secs(1).await;
        CLOCK.tick();
    }
}
