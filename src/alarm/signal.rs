//! RTC alarm-line edge flag.
//!
//! The DS3231 pulls INT/SQW low when an enabled alarm matches. The GPIO ISR
//! only calls [`alarm_isr_handler`]; all I2C traffic to find out *which*
//! alarm fired happens later in the foreground status check.

use core::sync::atomic::{AtomicBool, Ordering};

/// Line shared by the GPIO ISR and the foreground loop.
pub static ALARM_LINE: AlarmSignal = AlarmSignal::new();

pub struct AlarmSignal {
    raised: AtomicBool,
}

impl Default for AlarmSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmSignal {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// ISR side: record a falling edge.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Foreground side: read and clear in one step.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// Called from the alarm-pin GPIO ISR. Must not block.
pub fn alarm_isr_handler() {
    ALARM_LINE.raise();
}
