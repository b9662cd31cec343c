//! Four relay coils on GPIO outputs.
//!
//! Implements [`RelayBank`]. Most opto-isolated relay boards pull the coil in
//! when the input is driven low, so polarity is configurable.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::RelayBank;
use crate::lift::Relay;

pub struct GpioRelayBank<P> {
    pins: [P; 4],
    active_low: bool,
    energised: [bool; 4],
}

impl<P: OutputPin> GpioRelayBank<P> {
    /// Pins in `K1..K4` order. All coils are released immediately.
    pub fn new(pins: [P; 4], active_low: bool) -> Self {
        let mut bank = Self {
            pins,
            active_low,
            energised: [true; 4],
        };
        for relay in Relay::ALL {
            bank.set_relay(relay, false);
        }
        bank
    }

    /// Last level written to each coil, `K1..K4`.
    pub fn energised(&self) -> [bool; 4] {
        self.energised
    }

    fn level(&self, energised: bool) -> PinState {
        PinState::from(energised != self.active_low)
    }
}

impl<P: OutputPin> RelayBank for GpioRelayBank<P> {
    fn set_relay(&mut self, relay: Relay, energised: bool) {
        let idx = relay as usize;
        let level = self.level(energised);
        match self.pins[idx].set_state(level) {
            Ok(()) => self.energised[idx] = energised,
            Err(_) => warn!("Relay {:?}: GPIO write failed", relay),
        }
    }
}
