//! Rate limit between the sampled keypad and the UI state machine.

use crate::buttons::ButtonId;
use crate::tick::TickScheduler;

/// Releases at most one press per `hold_ticks` window.
pub struct InputGate {
    hold_ticks: u32,
}

impl InputGate {
    pub fn new(hold_ticks: u32) -> Self {
        Self { hold_ticks }
    }

    /// This cycle's UI input.
    ///
    /// Once the delay counter reaches the threshold the gate opens for one
    /// call: the counter restarts, delaying stops and the pending press is
    /// consumed. Otherwise the gate keeps the counter running and yields
    /// `None`.
    pub fn poll(&self, ticks: &TickScheduler) -> ButtonId {
        if ticks.ui_delay_ticks() >= self.hold_ticks {
            ticks.reset_ui_delay();
            ticks.set_ui_delaying(false);
            ticks.take_pending_button()
        } else {
            ticks.set_ui_delaying(true);
            ButtonId::None
        }
    }
}
