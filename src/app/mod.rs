//! Application core: pure domain logic, zero I/O.
//!
//! The controller ties the alarm check, the lift sequencer and the keypad
//! menu together. All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer testable without real
//! peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
