//! End-to-end session tests: the real controller, decoder and state machine
//! over scripted collaborators.

use core::cell::{Cell, RefCell};

use dryer_controller::alarm::Beeper;
use dryer_controller::clock::Clock;
use dryer_controller::display::TextDisplay;
use dryer_controller::dryer_controller::Dryer;
use dryer_controller::encoder::{EncoderDecoder, EventFlag};
use dryer_controller::heating::Stage;
use dryer_controller::inputs_std::{play_gesture, Gesture, SimEncoder, SimLevel};
use dryer_controller::profile::FILAMENTS;
use dryer_controller::{Heater, SensorError, TemperatureSensor};
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_time::Timer;
use futures::executor::block_on;

struct TestSensor<'a> {
    reading: &'a Cell<Result<i16, SensorError>>,
}

impl TemperatureSensor for TestSensor<'_> {
    async fn read(&mut self) -> Result<i16, SensorError> {
        // A real conversion takes time; the pause also keeps the control
        // loop from starving the scripted-user future.
        Timer::after_millis(5).await;
        self.reading.get()
    }
}

struct TestHeater<'a> {
    state: &'a Cell<bool>,
    history: &'a RefCell<Vec<bool>>,
}

impl Heater for TestHeater<'_> {
    fn set(&mut self, on: bool) {
        self.state.set(on);
        self.history.borrow_mut().push(on);
    }
}

struct TestDisplay<'a> {
    rows: &'a RefCell<[String; 2]>,
}

impl TextDisplay for TestDisplay<'_> {
    async fn clear(&mut self) {
        *self.rows.borrow_mut() = [String::new(), String::new()];
    }

    async fn write(&mut self, row: u8, _col: u8, text: &str) {
        self.rows.borrow_mut()[row as usize] = text.to_string();
    }
}

struct NullBeeper;

impl Beeper for NullBeeper {
    fn set(&mut self, _on: bool) {}
}

struct Bench {
    clock: Clock,
    level: SimLevel,
    event: EventFlag,
    reading: Cell<Result<i16, SensorError>>,
    heater: Cell<bool>,
    heater_log: RefCell<Vec<bool>>,
    rows: RefCell<[String; 2]>,
}

impl Bench {
    fn new() -> Self {
        Self {
            clock: Clock::new(),
            level: SimLevel::new(),
            event: EventFlag::new(),
            reading: Cell::new(Ok(25)),
            heater: Cell::new(false),
            heater_log: RefCell::new(Vec::new()),
            rows: RefCell::new([String::new(), String::new()]),
        }
    }

    fn dryer(
        &self,
    ) -> Dryer<'_, SimEncoder<'_>, TestSensor<'_>, TestHeater<'_>, TestDisplay<'_>, NullBeeper>
    {
        Dryer::new(
            EncoderDecoder::new(SimEncoder::new(&self.level), &self.event),
            TestSensor {
                reading: &self.reading,
            },
            TestHeater {
                state: &self.heater,
                history: &self.heater_log,
            },
            TestDisplay { rows: &self.rows },
            NullBeeper,
            &self.clock,
        )
    }

    async fn gesture(&self, gesture: Gesture) {
        play_gesture(&self.level, &self.event, gesture).await;
    }
}

#[test]
fn session_runs_from_menu_to_working() {
    let bench = Bench::new();
    let mut dryer = bench.dryer();
    bench.reading.set(Ok(44));

    block_on(async {
        let control = async {
            // First pass covers the menu (confirm on PLA), the first sensor
            // reading and the Idle -> Preheating transition. The transition
            // resets the elapsed counter, which also swallows the pending
            // repaint, so the screen stays blank after the menu clear.
            dryer.cycle().await.unwrap();
            assert_eq!(dryer.selected().map(|f| f.name), Some("PLA"));
            assert_eq!(dryer.stage(), Stage::Preheating);
            assert!(dryer.heater_on());
            assert_eq!(bench.rows.borrow()[0], "");

            // The next tick repaints with the live status.
            bench.clock.tick();
            dryer.cycle().await.unwrap();
            assert_eq!(bench.rows.borrow()[0], "PLA 45 / 44* H  ");
            assert_eq!(bench.rows.borrow()[1], "Preheating 00:01");

            // Target crossed: Working, heater off, countdown restarted.
            bench.reading.set(Ok(46));
            dryer.cycle().await.unwrap();
            assert_eq!(dryer.stage(), Stage::Working);
            assert!(!dryer.heater_on());
            assert_eq!(bench.clock.seconds(), 0);

            bench.clock.tick();
            dryer.cycle().await.unwrap();
            assert_eq!(bench.rows.borrow()[0], "PLA 45 / 46*    ");
            assert_eq!(bench.rows.borrow()[1], "ETA 05:59:59    ");
        };
        let user = async {
            Timer::after_millis(20).await;
            bench.gesture(Gesture::Press).await;
        };
        join(control, user).await;
    });
}

#[test]
fn menu_wraps_backward_to_the_last_entry() {
    let bench = Bench::new();
    let mut dryer = bench.dryer();
    bench.reading.set(Ok(90));

    block_on(async {
        let control = async {
            dryer.cycle().await.unwrap();
        };
        let user = async {
            Timer::after_millis(20).await;
            bench.gesture(Gesture::RotatePrev).await;
            Timer::after_millis(400).await;
            bench.gesture(Gesture::Press).await;
        };
        join(control, user).await;
    });

    assert_eq!(dryer.selected().map(|f| f.name), Some("Nylon"));
}

#[test]
fn menu_wraps_forward_to_the_first_entry() {
    let bench = Bench::new();
    let mut dryer = bench.dryer();
    bench.reading.set(Ok(44));

    block_on(async {
        let control = async {
            dryer.cycle().await.unwrap();
            assert_eq!(dryer.selected().map(|f| f.name), Some("PLA"));
        };
        let user = async {
            Timer::after_millis(20).await;
            // Last entry via backward wrap, then forward wrap back to PLA.
            bench.gesture(Gesture::RotatePrev).await;
            Timer::after_millis(400).await;
            bench.gesture(Gesture::RotateNext).await;
            Timer::after_millis(400).await;
            bench.gesture(Gesture::Press).await;
        };
        join(control, user).await;
    });
}

#[test]
fn completed_session_signals_and_returns_to_menu() {
    let bench = Bench::new();
    let mut dryer = bench.dryer();
    bench.reading.set(Ok(44));

    block_on(async {
        let control = async {
            dryer.cycle().await.unwrap();
            assert_eq!(dryer.stage(), Stage::Preheating);

            bench.reading.set(Ok(46));
            dryer.cycle().await.unwrap();
            assert_eq!(dryer.stage(), Stage::Working);

            for _ in 0..FILAMENTS[0].time_secs + 1 {
                bench.clock.tick();
            }
            // Completion: heater off, finish screen, three beeps, wait for
            // the knob, back to no selection.
            dryer.cycle().await.unwrap();
            assert_eq!(dryer.selected(), None);
            assert!(!dryer.heater_on());
            assert_eq!(bench.rows.borrow()[0], "Finished!       ");
            assert_eq!(bench.rows.borrow()[1], "Press any key...");
        };
        let user = async {
            Timer::after_millis(20).await;
            bench.gesture(Gesture::Press).await;
            // The completion signal runs for eight seconds before the
            // controller listens for the acknowledge press.
            Timer::after_millis(8800).await;
            bench.gesture(Gesture::Press).await;
        };
        join(control, user).await;
    });

    let log = bench.heater_log.borrow();
    assert!(log.contains(&true));
    assert_eq!(log.last(), Some(&false));
}

#[test]
fn sensor_faults_panic_with_heater_off() {
    for (reading, banner) in [
        (Ok(0), "Frozen.         "),
        (Ok(1), "Frozen.         "),
        (Ok(120), "Burned.         "),
        (Ok(121), "Burned.         "),
        (Err(SensorError::Disconnected), "Temp NaN.       "),
    ] {
        let bench = Bench::new();
        let mut dryer = bench.dryer();
        bench.reading.set(Ok(44));

        block_on(async {
            let control = async {
                // The fault path never returns; only the watchdog timer gets
                // us back out of the locked machine.
                match select(dryer.run(), Timer::after_millis(700)).await {
                    Either::First(_) => unreachable!(),
                    Either::Second(()) => {}
                }
            };
            let user = async {
                Timer::after_millis(20).await;
                bench.gesture(Gesture::Press).await;
                Timer::after_millis(200).await;
                bench.reading.set(reading);
            };
            join(control, user).await;
        });

        assert!(!bench.heater.get(), "heater left on for {:?}", reading);
        assert_eq!(bench.rows.borrow()[0], "PANIC! Reason:  ");
        assert_eq!(bench.rows.borrow()[1], banner);
        let log = bench.heater_log.borrow();
        assert!(log.contains(&true));
        assert_eq!(log.last(), Some(&false));
    }
}

#[test]
fn stalled_preheat_panics() {
    let bench = Bench::new();
    let mut dryer = bench.dryer();
    bench.reading.set(Ok(44));

    block_on(async {
        let control = async {
            match select(dryer.run(), Timer::after_millis(900)).await {
                Either::First(_) => unreachable!(),
                Either::Second(()) => {}
            }
        };
        let user = async {
            Timer::after_millis(20).await;
            bench.gesture(Gesture::Press).await;
            Timer::after_millis(300).await;
            // An hour passes without the target being reached.
            for _ in 0..3600 {
                bench.clock.tick();
            }
        };
        join(control, user).await;
    });

    assert!(!bench.heater.get());
    assert_eq!(bench.rows.borrow()[0], "PANIC! Reason:  ");
    assert_eq!(bench.rows.borrow()[1], "Preheating.     ");
}
