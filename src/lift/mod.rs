//! Relay-driven door lift.
//!
//! The lift is a reversible AC gear motor switched by four relays:
//!
//! | Relay | Role |
//! |-------|------|
//! | K1 | extend winding |
//! | K2 | retract winding |
//! | K3 | motor supply |
//! | K4 | run-capacitor direction select (off = extend, on = retract) |
//!
//! Every command first drops all four relays and lets the contacts settle
//! before K4 moves, so the direction relay never switches under load.
//! There is no position feedback; run time is bounded by the hold timer in
//! [`sequencer`].

pub mod sequencer;

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::{LiftPort, RelayBank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiftCommand {
    #[default]
    Stop,
    /// Clockwise run: opens the door.
    Extend,
    /// Counter-clockwise run: closes the door.
    Retract,
}

impl fmt::Display for LiftCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Extend => write!(f, "extend"),
            Self::Retract => write!(f, "retract"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Relay {
    K1 = 0,
    K2 = 1,
    K3 = 2,
    K4 = 3,
}

impl Relay {
    pub const ALL: [Self; 4] = [Self::K1, Self::K2, Self::K3, Self::K4];
}

/// One step of a relay sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStep {
    Set(Relay, bool),
    Settle,
}

use RelayStep::{Set, Settle};

const ALL_OFF: [RelayStep; 4] = [
    Set(Relay::K1, false),
    Set(Relay::K2, false),
    Set(Relay::K3, false),
    Set(Relay::K4, false),
];

const STOP_SEQ: [RelayStep; 4] = ALL_OFF;

const EXTEND_SEQ: [RelayStep; 9] = [
    Set(Relay::K1, false),
    Set(Relay::K2, false),
    Set(Relay::K3, false),
    Set(Relay::K4, false),
    Settle,
    Set(Relay::K4, false),
    Settle,
    Set(Relay::K1, true),
    Set(Relay::K3, true),
];

const RETRACT_SEQ: [RelayStep; 9] = [
    Set(Relay::K1, false),
    Set(Relay::K2, false),
    Set(Relay::K3, false),
    Set(Relay::K4, false),
    Settle,
    Set(Relay::K4, true),
    Settle,
    Set(Relay::K2, true),
    Set(Relay::K3, true),
];

impl LiftCommand {
    /// The exact pin sequence for this command.
    pub fn relay_sequence(self) -> &'static [RelayStep] {
        match self {
            Self::Stop => &STOP_SEQ,
            Self::Extend => &EXTEND_SEQ,
            Self::Retract => &RETRACT_SEQ,
        }
    }
}

/// Executes lift commands on a relay bank.
pub struct LiftDriver<B: RelayBank, D: DelayNs> {
    relays: B,
    delay: D,
    settle_ms: u32,
    last: LiftCommand,
}

impl<B: RelayBank, D: DelayNs> LiftDriver<B, D> {
    pub fn new(relays: B, delay: D, settle_ms: u32) -> Self {
        Self {
            relays,
            delay,
            settle_ms,
            last: LiftCommand::Stop,
        }
    }

    /// Last command issued (not a sensed position).
    pub fn last_command(&self) -> LiftCommand {
        self.last
    }

    pub fn relays(&self) -> &B {
        &self.relays
    }
}

impl<B: RelayBank, D: DelayNs> LiftPort for LiftDriver<B, D> {
    fn execute(&mut self, command: LiftCommand) {
        debug!("Lift: {}", command);
        for step in command.relay_sequence() {
            match *step {
                Set(relay, on) => self.relays.set_relay(relay, on),
                Settle => self.delay.delay_ms(self.settle_ms),
            }
        }
        self.last = command;
    }
}
