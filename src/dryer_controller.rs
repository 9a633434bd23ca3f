use crate::alarm::{self, Beeper};
use crate::clock::Clock;
use crate::display::{self, TextDisplay};
use crate::encoder::{Action, EncoderDecoder, RawEncoder};
use crate::heating::{HeaterCommand, HeatingStateMachine, Stage};
use crate::log::*;
use crate::profile::{self, Filament, FILAMENTS};
use crate::{Heater, SensorError, TemperatureSensor};

/// Reasons the appliance gives up and locks into the distress loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultReason {
    /// Sensor gave no reading at all.
    SensorLost,
    /// Reading implausibly low: probe shorted or fell out of the chamber.
    Frozen,
    /// Reading implausibly high: something is burning.
    Burned,
    /// Target not reached within the preheat ceiling.
    PreheatStall,
    /// Heating decision requested with no profile selected.
    NoProfile,
}

impl FaultReason {
    /// Short on-screen text for the second row of the fault banner.
    pub fn label(self) -> &'static str {
        match self {
            FaultReason::SensorLost => "Temp NaN.",
            FaultReason::Frozen => "Frozen.",
            FaultReason::Burned => "Burned.",
            FaultReason::PreheatStall => "Preheating.",
            FaultReason::NoProfile => "Heater state.",
        }
    }
}

/// At or below this the probe cannot be believed.
pub const MIN_PLAUSIBLE_C: i16 = 1;
/// At or above this the chamber is burning, not drying.
pub const MAX_PLAUSIBLE_C: i16 = 120;

/// Plausibility screen applied to every reading. The driver only reports
/// wire-level faults; the bounds are ours.
pub fn check_reading(reading: Result<i16, SensorError>) -> Result<i16, FaultReason> {
    let temp_c = reading.map_err(|_| FaultReason::SensorLost)?;
    if temp_c <= MIN_PLAUSIBLE_C {
        return Err(FaultReason::Frozen);
    }
    if temp_c >= MAX_PLAUSIBLE_C {
        return Err(FaultReason::Burned);
    }
    Ok(temp_c)
}

/// The whole session context: selection, stage machine, actuator shadow
/// state. Owns the collaborators and is the single writer of all of them.
pub struct Dryer<'a, R, S, H, D, B> {
    encoder: EncoderDecoder<'a, R>,
    sensor: S,
    heater: H,
    display: D,
    beeper: B,
    clock: &'a Clock,
    machine: HeatingStateMachine,
    filament: Option<&'static Filament>,
    heater_on: bool,
}

impl<'a, R, S, H, D, B> Dryer<'a, R, S, H, D, B>
where
    R: RawEncoder,
    S: TemperatureSensor,
    H: Heater,
    D: TextDisplay,
    B: Beeper,
{
    pub fn new(
        encoder: EncoderDecoder<'a, R>,
        sensor: S,
        heater: H,
        display: D,
        beeper: B,
        clock: &'a Clock,
    ) -> Self {
        Self {
            encoder,
            sensor,
            heater,
            display,
            beeper,
            clock,
            machine: HeatingStateMachine::new(),
            filament: None,
            heater_on: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.machine.stage()
    }

    pub fn heater_on(&self) -> bool {
        self.heater_on
    }

    pub fn selected(&self) -> Option<&'static Filament> {
        self.filament
    }

    /// Power-on: heater forced off before anything else, then the greeting.
    pub async fn startup(&mut self) {
        self.set_heater(HeaterCommand::Off);
        display::draw_boot(&mut self.display).await;
        alarm::startup_chirp(&mut self.beeper).await;
    }

    /// Run until the hardware is reset. A fault never comes back out.
    pub async fn run(&mut self) -> ! {
        loop {
            if let Err(fault) = self.cycle().await {
                self.panic(fault).await;
            }
        }
    }

    /// One pass of the outer control loop.
    pub async fn cycle(&mut self) -> Result<(), FaultReason> {
        if self.filament.is_none() {
            self.set_heater(HeaterCommand::Off);
            self.choose_filament().await;
            self.display.clear().await;
            self.clock.reset();
            self.machine.reset();
            self.clock.mark_stale();
        }

        let filament = self.filament.ok_or(FaultReason::NoProfile)?;

        if self.machine.is_complete(filament, self.clock) {
            self.finish_session(filament).await;
            return Ok(());
        }

        let temp_c = check_reading(self.sensor.read().await)?;
        let (command, _) = self
            .machine
            .advance(temp_c, filament, self.clock)
            .map_err(|_| FaultReason::PreheatStall)?;
        self.set_heater(command);

        if self.clock.take_stale() {
            display::draw_status(
                &mut self.display,
                filament,
                temp_c,
                self.heater_on,
                self.machine.stage(),
                self.clock.seconds(),
            )
            .await;
        }

        Ok(())
    }

    /// Selection menu. Navigation wraps at both catalog ends; the choice is
    /// committed by Confirm only.
    async fn choose_filament(&mut self) {
        self.display.clear().await;
        let mut idx = 0;
        display::draw_menu(&mut self.display, &FILAMENTS[idx]).await;

        loop {
            match self.encoder.wait_for_action().await {
                Action::Confirm => break,
                Action::Next => idx = profile::next_index(idx),
                Action::Prev => idx = profile::prev_index(idx),
                Action::None => continue,
            }
            display::draw_menu(&mut self.display, &FILAMENTS[idx]).await;
        }

        info!("selected {}", FILAMENTS[idx].name);
        self.filament = Some(&FILAMENTS[idx]);
    }

    /// End of a drying run: heater off first, then the signal, then wait for
    /// the knob before returning to the menu.
    async fn finish_session(&mut self, filament: &Filament) {
        info!("{} dried, session complete", filament.name);
        self.set_heater(HeaterCommand::Off);
        display::draw_finished(&mut self.display).await;
        alarm::completion_signal(&mut self.beeper).await;

        while self.encoder.wait_for_action().await != Action::Confirm {}

        self.filament = None;
    }

    fn set_heater(&mut self, command: HeaterCommand) {
        let on = command == HeaterCommand::On;
        self.heater.set(on);
        self.heater_on = on;
    }

    /// Terminal error funnel. Heater off, reason on screen, distress signal
    /// until someone pulls the plug.
    async fn panic(&mut self, fault: FaultReason) -> ! {
        error!("fault: {}", fault.label());
        self.set_heater(HeaterCommand::Off);
        display::draw_fault(&mut self.display, fault.label()).await;
        alarm::distress_loop(&mut self.beeper).await
    }
}
