//! Outbound application events.
//!
//! The [`CoopController`](super::service::CoopController) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::alarm::AlarmSlot;
use crate::clock::ClockTime;
use crate::error::Error;
use crate::lift::LiftCommand;
use crate::ui::UiStateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started. Carries the RTC time at boot (`None` if
    /// the clock could not be read) and the alarm times loaded from storage.
    Started {
        now: Option<ClockTime>,
        open_at: ClockTime,
        close_at: ClockTime,
    },

    /// An RTC alarm was confirmed by the status check.
    AlarmFired(AlarmSlot),

    /// A command was sent to the lift relays.
    LiftCommanded(LiftCommand),

    /// The run window closed without a new alarm; the lift was stopped.
    HoldExpired,

    /// The keypad menu moved between states.
    UiStateChanged { from: UiStateId, to: UiStateId },

    /// The user committed a new wall-clock time.
    ClockSet(ClockTime),

    /// The user committed a new alarm time.
    AlarmScheduled { slot: AlarmSlot, time: ClockTime },

    /// A port call failed; the cycle continued with a no-op.
    PortFault(Error),
}
