//! Alarm-driven lift sequencing with a bounded run window.
//!
//! ```text
//!            Slot1Fired / Extend            hold elapsed / Stop
//!  Stopped ─────────────────────▶ Running ─────────────────────▶ Stopped
//!          ─────────────────────▶   ▲  │
//!            Slot2Fired / Retract   └──┘ any alarm: restart window
//! ```

use log::info;

use crate::alarm::AlarmEvent;
use crate::app::ports::LiftPort;
use crate::lift::LiftCommand;
use crate::tick::TickScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiftState {
    #[default]
    Stopped,
    /// Running in the given direction (`Extend` or `Retract`).
    Running(LiftCommand),
}

pub struct LiftSequencer {
    state: LiftState,
    hold_ticks: u32,
}

impl LiftSequencer {
    pub fn new(hold_ticks: u32) -> Self {
        Self {
            state: LiftState::Stopped,
            hold_ticks,
        }
    }

    pub fn state(&self) -> LiftState {
        self.state
    }

    pub fn hold_ticks(&self) -> u32 {
        self.hold_ticks
    }

    /// One foreground step. Returns the command issued, if any.
    ///
    /// A fresh alarm always wins, even mid-travel in the opposite direction.
    pub fn update(
        &mut self,
        event: AlarmEvent,
        ticks: &TickScheduler,
        lift: &mut impl LiftPort,
    ) -> Option<LiftCommand> {
        match event {
            AlarmEvent::Slot1Fired => Some(self.command(LiftCommand::Extend, ticks, lift)),
            AlarmEvent::Slot2Fired => Some(self.command(LiftCommand::Retract, ticks, lift)),
            AlarmEvent::None if self.hold_expired(ticks) => {
                info!("Lift: hold window elapsed after {} ticks", ticks.hold_elapsed());
                Some(self.command(LiftCommand::Stop, ticks, lift))
            }
            AlarmEvent::None => None,
        }
    }

    /// Issue `command` directly. Runs open a fresh hold window, so manual
    /// runs are bounded the same way as alarm runs.
    pub fn command(
        &mut self,
        command: LiftCommand,
        ticks: &TickScheduler,
        lift: &mut impl LiftPort,
    ) -> LiftCommand {
        lift.execute(command);
        match command {
            LiftCommand::Stop => {
                ticks.stop_hold();
                self.state = LiftState::Stopped;
            }
            LiftCommand::Extend | LiftCommand::Retract => {
                ticks.start_hold();
                self.state = LiftState::Running(command);
                info!("Lift: {} for up to {} ticks", command, self.hold_ticks);
            }
        }
        command
    }

    fn hold_expired(&self, ticks: &TickScheduler) -> bool {
        ticks.hold_active() && ticks.hold_elapsed() >= self.hold_ticks
    }
}
