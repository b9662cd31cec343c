//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CoopController (domain)
//! ```
//!
//! Driven adapters (RTC, byte store, LCD, relays, keypad ADC, event sinks)
//! implement these traits. The [`CoopController`](super::service::CoopController)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every path is testable with the mocks in `tests/integration`.

use crate::alarm::AlarmSlot;
use crate::clock::ClockTime;
use crate::config::ControllerConfig;
use crate::error::{ClockError, DisplayError, StorageError};
use crate::lift::{LiftCommand, Relay};

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: RTC ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Battery-backed real-time clock with two daily match-alarms.
pub trait ClockPort {
    /// Current wall time.
    fn now(&mut self) -> Result<ClockTime, ClockError>;

    /// Overwrite the wall time.
    fn set_time(&mut self, time: &ClockTime) -> Result<(), ClockError>;

    /// Program `slot` to match hour, minute and second once per day.
    fn arm_alarm(&mut self, slot: AlarmSlot, hour: u8, minute: u8, second: u8)
    -> Result<(), ClockError>;

    /// Clear the slot's pending flag. Returns whether it was set.
    fn clear_alarm_flag(&mut self, slot: AlarmSlot) -> Result<bool, ClockError>;

    /// Route (or stop routing) the slot's match to the interrupt line.
    fn enable_alarm_interrupt(&mut self, slot: AlarmSlot, enabled: bool)
    -> Result<(), ClockError>;

    /// Free the shared INT/SQW pin for alarm use.
    fn disable_square_wave(&mut self) -> Result<(), ClockError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ EEPROM / NVS)
// ───────────────────────────────────────────────────────────────

/// Small byte-addressable persistent store.
pub trait StoragePort {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError>;

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError>;

    /// Number of addressable bytes.
    fn capacity(&self) -> u16;

    /// Fill `buf` from consecutive addresses starting at `addr`.
    fn read_bytes(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError> {
        for (offset, byte) in buf.iter_mut().enumerate() {
            let at = addr.checked_add(offset as u16).ok_or(StorageError::OutOfRange(addr))?;
            *byte = self.read_byte(at)?;
        }
        Ok(())
    }

    /// Write `data` to consecutive addresses starting at `addr`.
    fn write_bytes(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        for (offset, &byte) in data.iter().enumerate() {
            let at = addr.checked_add(offset as u16).ok_or(StorageError::OutOfRange(addr))?;
            self.write_byte(at, byte)?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → character LCD)
// ───────────────────────────────────────────────────────────────

/// 16x2 character display.
pub trait DisplayPort {
    fn clear(&mut self) -> Result<(), DisplayError>;

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Blink the block cursor at its current position.
    fn set_blink(&mut self, on: bool) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Input / output ports (driven adapters: raw pins)
// ───────────────────────────────────────────────────────────────

/// Non-blocking analog read used by the keypad sampler in timer context.
pub trait AnalogPort {
    fn read_channel(&mut self, channel: u8) -> u16;
}

/// Four-relay output bank.
pub trait RelayBank {
    fn set_relay(&mut self, relay: Relay, energised: bool);
}

/// Executes one lift command to completion.
pub trait LiftPort {
    fn execute(&mut self, command: LiftCommand);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// ranges with [`ConfigError::ValidationFailed`] rather than clamping.
pub trait ConfigPort {
    /// Load configuration. Returns [`ConfigError::NotFound`] on first boot.
    fn load(&mut self) -> Result<ControllerConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &ControllerConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Encoded config does not fit its storage region.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(_: StorageError) -> Self {
        Self::IoError
    }
}
