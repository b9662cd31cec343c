//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the RTC, the byte store, the LCD and the lift driver, exposing
//! them through the four foreground ports so the controller can take a
//! single `hw` argument. Each impl is pure delegation.

use crate::alarm::AlarmSlot;
use crate::app::ports::{ClockPort, DisplayPort, LiftPort, StoragePort};
use crate::clock::ClockTime;
use crate::error::{ClockError, DisplayError, StorageError};
use crate::lift::LiftCommand;

/// Concrete adapter that combines all foreground hardware behind port traits.
pub struct HardwareAdapter<C, S, D, L> {
    pub clock: C,
    pub storage: S,
    pub display: D,
    pub lift: L,
}

impl<C, S, D, L> HardwareAdapter<C, S, D, L> {
    pub fn new(clock: C, storage: S, display: D, lift: L) -> Self {
        Self {
            clock,
            storage,
            display,
            lift,
        }
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl<C: ClockPort, S, D, L> ClockPort for HardwareAdapter<C, S, D, L> {
    fn now(&mut self) -> Result<ClockTime, ClockError> {
        self.clock.now()
    }

    fn set_time(&mut self, time: &ClockTime) -> Result<(), ClockError> {
        self.clock.set_time(time)
    }

    fn arm_alarm(&mut self, slot: AlarmSlot, hour: u8, minute: u8, second: u8) -> Result<(), ClockError> {
        self.clock.arm_alarm(slot, hour, minute, second)
    }

    fn clear_alarm_flag(&mut self, slot: AlarmSlot) -> Result<bool, ClockError> {
        self.clock.clear_alarm_flag(slot)
    }

    fn enable_alarm_interrupt(&mut self, slot: AlarmSlot, on: bool) -> Result<(), ClockError> {
        self.clock.enable_alarm_interrupt(slot, on)
    }

    fn disable_square_wave(&mut self) -> Result<(), ClockError> {
        self.clock.disable_square_wave()
    }
}

// ── StoragePort implementation ────────────────────────────────

impl<C, S: StoragePort, D, L> StoragePort for HardwareAdapter<C, S, D, L> {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError> {
        self.storage.read_byte(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        self.storage.write_byte(addr, value)
    }

    fn capacity(&self) -> u16 {
        self.storage.capacity()
    }

    fn read_bytes(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError> {
        self.storage.read_bytes(addr, buf)
    }

    fn write_bytes(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        self.storage.write_bytes(addr, data)
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<C, S, D: DisplayPort, L> DisplayPort for HardwareAdapter<C, S, D, L> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.display.clear()
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.display.set_cursor(col, row)
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        self.display.write_str(text)
    }

    fn set_blink(&mut self, on: bool) -> Result<(), DisplayError> {
        self.display.set_blink(on)
    }
}

// ── LiftPort implementation ───────────────────────────────────

impl<C, S, D, L: LiftPort> LiftPort for HardwareAdapter<C, S, D, L> {
    fn execute(&mut self, command: LiftCommand) {
        self.lift.execute(command);
    }
}
