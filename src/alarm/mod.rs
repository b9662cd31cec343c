//! The two daily door alarms.
//!
//! * [`signal`]: edge flag raised by the RTC interrupt line.
//! * [`monitor`]: foreground status check turning the flag into an [`AlarmEvent`].
//! * [`store`]: cached, persisted alarm times kept in sync with the RTC.

pub mod monitor;
pub mod signal;
pub mod store;

use core::fmt;

/// Which of the two RTC match-alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmSlot {
    /// Alarm 1: door opens.
    Open,
    /// Alarm 2: door closes.
    Close,
}

impl AlarmSlot {
    /// Fixed polling priority.
    pub const ALL: [Self; 2] = [Self::Open, Self::Close];

    pub const fn index(self) -> usize {
        match self {
            Self::Open => 0,
            Self::Close => 1,
        }
    }
}

impl fmt::Display for AlarmSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Close => write!(f, "close"),
        }
    }
}

/// Result of one alarm status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmEvent {
    #[default]
    None,
    Slot1Fired,
    Slot2Fired,
}

impl AlarmEvent {
    pub const fn fired(slot: AlarmSlot) -> Self {
        match slot {
            AlarmSlot::Open => Self::Slot1Fired,
            AlarmSlot::Close => Self::Slot2Fired,
        }
    }

    pub const fn slot(self) -> Option<AlarmSlot> {
        match self {
            Self::None => None,
            Self::Slot1Fired => Some(AlarmSlot::Open),
            Self::Slot2Fired => Some(AlarmSlot::Close),
        }
    }
}
