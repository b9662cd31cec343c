//! Foreground alarm status check.

use log::warn;

use super::signal::AlarmSignal;
use super::{AlarmEvent, AlarmSlot};
use crate::app::ports::ClockPort;

/// Poll the alarm line and resolve which slot fired.
///
/// Slot 1 is checked first and only its flag is cleared when it fires, so if
/// both matched at once slot 2 stays pending on the RTC and is reported only
/// when the line is raised again. A spurious edge yields [`AlarmEvent::None`].
pub fn check_alarm_status(signal: &AlarmSignal, clock: &mut impl ClockPort) -> AlarmEvent {
    if !signal.take() {
        return AlarmEvent::None;
    }

    for slot in AlarmSlot::ALL {
        match clock.clear_alarm_flag(slot) {
            Ok(true) => return AlarmEvent::fired(slot),
            Ok(false) => {}
            Err(e) => warn!("Alarm check: {} flag unreadable: {}", slot, e),
        }
    }
    AlarmEvent::None
}
