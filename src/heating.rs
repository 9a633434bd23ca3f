use crate::clock::Clock;
use crate::profile::Filament;

/// Coarse phase of the drying process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Preheating,
    Working,
}

/// Heater command decided for one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterCommand {
    On,
    Off,
}

/// Preheat may take this long before it counts as a stalled heater.
pub const PREHEAT_CEILING_SECS: u32 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatingFault {
    PreheatStall,
}

pub struct HeatingStateMachine {
    stage: Stage,
}

impl HeatingStateMachine {
    pub const fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Back to the pre-run state for the next session.
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
    }

    /// One control decision from a fresh reading.
    ///
    /// The decision depends only on the reading and the previous stage; the
    /// elapsed counter is reset exactly when the stage changes, so the
    /// Preheating display counts up from zero and the Working countdown
    /// starts the moment the target is first reached.
    pub fn advance(
        &mut self,
        temp_c: i16,
        filament: &Filament,
        clock: &Clock,
    ) -> Result<(HeaterCommand, Stage), HeatingFault> {
        let command = if temp_c > filament.temp_c {
            // First moment at or past the target: either the end of the
            // preheat ramp, or a start above target because the chamber
            // never cooled down from the previous run.
            if self.stage != Stage::Working {
                self.stage = Stage::Working;
                clock.reset();
            }
            HeaterCommand::Off
        } else {
            if self.stage == Stage::Idle {
                self.stage = Stage::Preheating;
                clock.reset();
            }
            HeaterCommand::On
        };

        if self.stage == Stage::Preheating && clock.seconds() >= PREHEAT_CEILING_SECS {
            return Err(HeatingFault::PreheatStall);
        }

        Ok((command, self.stage))
    }

    /// Session-complete trip: Working stage past the configured drying time.
    pub fn is_complete(&self, filament: &Filament, clock: &Clock) -> bool {
        self.stage == Stage::Working && clock.seconds() > filament.time_secs
    }
}
