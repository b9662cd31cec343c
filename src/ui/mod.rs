//! Table-driven keypad menu.
//!
//! ```text
//!            ◀ Left          Right ▶
//!  ViewClose ◀──▶ ViewTime ◀──▶ ViewOpen ◀──▶ ViewClose
//!                    │ Select
//!                    ▼
//!  EditHourTens ─Right─▶ EditHourOnes ─▶ EditMinuteTens ─▶ EditMinuteOnes
//!       │ Left (discard)                                     │ Select (commit)
//!       ▼                                                    ▼
//!    ViewTime ◀──────────────────────────────────────────  ViewTime
//! ```
//!
//! The same four edit states exist for each of the three targets (clock,
//! opening alarm, closing alarm), giving 15 states. Each row of the table
//! names its caption, where its buffer comes from, and a button handler that
//! returns a [`UiTransition`]. The machine itself does no I/O: the controller
//! refreshes the buffer from [`UiMachine::source`] and performs commits.

pub mod edit;
pub mod gate;
pub mod screen;
pub mod states;

use log::info;

use crate::alarm::AlarmSlot;
use crate::buttons::ButtonId;
use crate::clock::ClockTime;
use screen::Screen;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Every UI state. Indices group as `target * 5 + (0 = view, 1..=4 = digit)`.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UiStateId {
    ViewTime = 0,
    EditTimeHourTens = 1,
    EditTimeHourOnes = 2,
    EditTimeMinuteTens = 3,
    EditTimeMinuteOnes = 4,
    ViewOpen = 5,
    EditOpenHourTens = 6,
    EditOpenHourOnes = 7,
    EditOpenMinuteTens = 8,
    EditOpenMinuteOnes = 9,
    ViewClose = 10,
    EditCloseHourTens = 11,
    EditCloseHourOnes = 12,
    EditCloseMinuteTens = 13,
    EditCloseMinuteOnes = 14,
}

impl UiStateId {
    pub const COUNT: usize = 15;

    pub const ALL: [Self; Self::COUNT] = [
        Self::ViewTime,
        Self::EditTimeHourTens,
        Self::EditTimeHourOnes,
        Self::EditTimeMinuteTens,
        Self::EditTimeMinuteOnes,
        Self::ViewOpen,
        Self::EditOpenHourTens,
        Self::EditOpenHourOnes,
        Self::EditOpenMinuteTens,
        Self::EditOpenMinuteOnes,
        Self::ViewClose,
        Self::EditCloseHourTens,
        Self::EditCloseHourOnes,
        Self::EditCloseMinuteTens,
        Self::EditCloseMinuteOnes,
    ];

    /// Convert an index back to `UiStateId`. Out-of-range falls back to
    /// `ViewTime` (asserts in debug builds).
    pub fn from_index(idx: usize) -> Self {
        match Self::ALL.get(idx) {
            Some(id) => *id,
            None => {
                debug_assert!(false, "invalid UI state index: {idx}");
                Self::ViewTime
            }
        }
    }

    pub fn target(self) -> EditTarget {
        match self as u8 / 5 {
            0 => EditTarget::Clock,
            1 => EditTarget::OpenAlarm,
            _ => EditTarget::CloseAlarm,
        }
    }

    /// The digit being edited, or `None` for view states.
    pub fn digit(self) -> Option<Digit> {
        match self as u8 % 5 {
            1 => Some(Digit::HourTens),
            2 => Some(Digit::HourOnes),
            3 => Some(Digit::MinuteTens),
            4 => Some(Digit::MinuteOnes),
            _ => None,
        }
    }

    pub fn is_edit(self) -> bool {
        self.digit().is_some()
    }

    pub fn view(target: EditTarget) -> Self {
        Self::from_index(target as usize * 5)
    }

    pub fn edit(target: EditTarget, digit: Digit) -> Self {
        Self::from_index(target as usize * 5 + digit as usize + 1)
    }
}

/// What a group of states shows and edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EditTarget {
    Clock = 0,
    OpenAlarm = 1,
    CloseAlarm = 2,
}

impl EditTarget {
    pub fn alarm_slot(self) -> Option<AlarmSlot> {
        match self {
            Self::Clock => None,
            Self::OpenAlarm => Some(AlarmSlot::Open),
            Self::CloseAlarm => Some(AlarmSlot::Close),
        }
    }

    /// Next view to the right.
    pub fn next(self) -> Self {
        match self {
            Self::Clock => Self::OpenAlarm,
            Self::OpenAlarm => Self::CloseAlarm,
            Self::CloseAlarm => Self::Clock,
        }
    }

    /// Next view to the left.
    pub fn prev(self) -> Self {
        match self {
            Self::Clock => Self::CloseAlarm,
            Self::OpenAlarm => Self::Clock,
            Self::CloseAlarm => Self::OpenAlarm,
        }
    }
}

/// One editable digit of `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Digit {
    HourTens = 0,
    HourOnes = 1,
    MinuteTens = 2,
    MinuteOnes = 3,
}

impl Digit {
    pub fn next(self) -> Option<Self> {
        match self {
            Self::HourTens => Some(Self::HourOnes),
            Self::HourOnes => Some(Self::MinuteTens),
            Self::MinuteTens => Some(Self::MinuteOnes),
            Self::MinuteOnes => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            Self::HourTens => None,
            Self::HourOnes => Some(Self::HourTens),
            Self::MinuteTens => Some(Self::HourOnes),
            Self::MinuteOnes => Some(Self::MinuteTens),
        }
    }

    /// LCD column of this digit in `HH:MM`.
    pub fn column(self) -> u8 {
        match self {
            Self::HourTens => 0,
            Self::HourOnes => 1,
            Self::MinuteTens => 3,
            Self::MinuteOnes => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

/// Where a state's buffer is reloaded from each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    LiveClock,
    Alarm(AlarmSlot),
    /// Edit states keep the buffer they were entered with.
    Keep,
}

/// Outcome of one button in one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiTransition {
    Stay,
    Goto(UiStateId),
    /// Write the buffer to the current target, then go to the given state.
    Commit(UiStateId),
}

/// Blackboard passed to every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub state: UiStateId,
    pub buffer: ClockTime,
}

pub type ButtonHandlerFn = fn(&mut UiContext, ButtonId) -> UiTransition;

/// One row of the state table.
pub struct StateDescriptor {
    pub id: UiStateId,
    pub name: &'static str,
    pub title: &'static str,
    pub source: Source,
    pub on_button: ButtonHandlerFn,
}

/// A buffer value to write to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub target: EditTarget,
    pub value: ClockTime,
}

/// Result of [`UiMachine::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiStep {
    pub from: UiStateId,
    pub to: UiStateId,
    pub commit: Option<Commit>,
}

impl UiStep {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct UiMachine {
    table: [StateDescriptor; UiStateId::COUNT],
    ctx: UiContext,
}

impl UiMachine {
    pub fn new(table: [StateDescriptor; UiStateId::COUNT], initial: UiStateId) -> Self {
        Self {
            table,
            ctx: UiContext {
                state: initial,
                buffer: ClockTime::EPOCH,
            },
        }
    }

    pub fn current_state(&self) -> UiStateId {
        self.ctx.state
    }

    pub fn buffer(&self) -> &ClockTime {
        &self.ctx.buffer
    }

    pub fn descriptor(&self) -> &StateDescriptor {
        &self.table[self.ctx.state as usize]
    }

    pub fn source(&self) -> Source {
        self.descriptor().source
    }

    /// Replace the buffer with a freshly read value.
    pub fn load(&mut self, value: ClockTime) {
        self.ctx.buffer = value;
    }

    /// Apply one gated button.
    pub fn handle(&mut self, button: ButtonId) -> UiStep {
        let from = self.ctx.state;
        let transition = (self.table[from as usize].on_button)(&mut self.ctx, button);

        let (to, commit) = match transition {
            UiTransition::Stay => (from, None),
            UiTransition::Goto(next) => (next, None),
            UiTransition::Commit(next) => (
                next,
                Some(Commit {
                    target: from.target(),
                    value: self.ctx.buffer,
                }),
            ),
        };

        if to != from {
            self.transition(to);
        }
        UiStep { from, to, commit }
    }

    /// Jump straight to a state, bypassing handlers.
    pub fn force_transition(&mut self, next: UiStateId) {
        if next != self.ctx.state {
            self.transition(next);
        }
    }

    pub fn screen(&self) -> Screen {
        let d = self.descriptor();
        Screen::new(d.title, &self.ctx.buffer, d.id.digit().map(Digit::column))
    }

    fn transition(&mut self, next: UiStateId) {
        info!(
            "UI transition: {} -> {}",
            self.table[self.ctx.state as usize].name, self.table[next as usize].name
        );
        self.ctx.state = next;
    }
}
