//! Mock hardware adapter for integration tests.
//!
//! Implements every foreground port and records each call so tests can
//! assert on the full command history without touching real I²C, NVS or
//! GPIO.

use coopdoor::alarm::AlarmSlot;
use coopdoor::app::events::AppEvent;
use coopdoor::app::ports::{ClockPort, DisplayPort, EventSink, LiftPort, StoragePort};
use coopdoor::buttons::ButtonId;
use coopdoor::clock::ClockTime;
use coopdoor::error::{ClockError, DisplayError, StorageError};
use coopdoor::lift::LiftCommand;
use coopdoor::tick::TickScheduler;

pub const MEM_LEN: usize = 64;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    SetTime(ClockTime),
    ArmAlarm { slot: AlarmSlot, hour: u8, minute: u8, second: u8 },
    WriteBytes { addr: u16, len: usize },
    Lift(LiftCommand),
    Redraw,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Wall time returned by `now()`; `set_time` overwrites it.
    pub now: ClockTime,
    /// RTC alarm-match flags.
    pub flags: [bool; 2],
    pub irq_enabled: [bool; 2],
    pub square_wave_off: bool,
    pub fail_clock: bool,
    pub mem: [u8; MEM_LEN],
    pub rows: [String; 2],
    pub cursor: (u8, u8),
    pub blink: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::with_mem([0; MEM_LEN])
    }

    /// A board whose persistent store already holds `mem`.
    pub fn with_mem(mem: [u8; MEM_LEN]) -> Self {
        Self {
            calls: Vec::new(),
            now: ClockTime::new(2025, 3, 1, 5, 30, 0),
            flags: [false; 2],
            irq_enabled: [false; 2],
            square_wave_off: false,
            fail_clock: false,
            mem,
            rows: [String::new(), String::new()],
            cursor: (0, 0),
            blink: false,
        }
    }

    pub fn lift_commands(&self) -> Vec<LiftCommand> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Lift(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    pub fn set_time_calls(&self) -> Vec<ClockTime> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::SetTime(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn redraws(&self) -> usize {
        self.calls.iter().filter(|c| **c == HwCall::Redraw).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn clock_ok(&self) -> Result<(), ClockError> {
        if self.fail_clock { Err(ClockError::Bus) } else { Ok(()) }
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for MockHardware {
    fn now(&mut self) -> Result<ClockTime, ClockError> {
        self.clock_ok()?;
        Ok(self.now)
    }

    fn set_time(&mut self, time: &ClockTime) -> Result<(), ClockError> {
        self.clock_ok()?;
        self.calls.push(HwCall::SetTime(*time));
        self.now = *time;
        Ok(())
    }

    fn arm_alarm(&mut self, slot: AlarmSlot, hour: u8, minute: u8, second: u8) -> Result<(), ClockError> {
        self.clock_ok()?;
        self.calls.push(HwCall::ArmAlarm { slot, hour, minute, second });
        Ok(())
    }

    fn clear_alarm_flag(&mut self, slot: AlarmSlot) -> Result<bool, ClockError> {
        self.clock_ok()?;
        let was = self.flags[slot.index()];
        self.flags[slot.index()] = false;
        Ok(was)
    }

    fn enable_alarm_interrupt(&mut self, slot: AlarmSlot, enabled: bool) -> Result<(), ClockError> {
        self.clock_ok()?;
        self.irq_enabled[slot.index()] = enabled;
        Ok(())
    }

    fn disable_square_wave(&mut self) -> Result<(), ClockError> {
        self.clock_ok()?;
        self.square_wave_off = true;
        Ok(())
    }
}

impl StoragePort for MockHardware {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError> {
        self.mem.get(addr as usize).copied().ok_or(StorageError::OutOfRange(addr))
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        let b = self.mem.get_mut(addr as usize).ok_or(StorageError::OutOfRange(addr))?;
        *b = value;
        Ok(())
    }

    fn capacity(&self) -> u16 {
        MEM_LEN as u16
    }

    fn write_bytes(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        self.calls.push(HwCall::WriteBytes { addr, len: data.len() });
        for (i, &b) in data.iter().enumerate() {
            self.write_byte(addr + i as u16, b)?;
        }
        Ok(())
    }
}

impl DisplayPort for MockHardware {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.calls.push(HwCall::Redraw);
        self.rows = [String::new(), String::new()];
        self.cursor = (0, 0);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if row > 1 || col > 15 {
            return Err(DisplayError::OutOfBounds);
        }
        self.cursor = (col, row);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        let row = &mut self.rows[self.cursor.1 as usize];
        row.push_str(text);
        self.cursor.0 += text.len() as u8;
        Ok(())
    }

    fn set_blink(&mut self, on: bool) -> Result<(), DisplayError> {
        self.blink = on;
        Ok(())
    }
}

impl LiftPort for MockHardware {
    fn execute(&mut self, command: LiftCommand) {
        self.calls.push(HwCall::Lift(command));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Tick helpers ──────────────────────────────────────────────

/// Advance the scheduler with the keypad reporting `button` throughout.
#[allow(dead_code)]
pub fn run_ticks(ticks: &TickScheduler, n: u32, button: ButtonId) {
    for _ in 0..n {
        ticks.tick(|| button);
    }
}
