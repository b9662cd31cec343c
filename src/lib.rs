//! CoopDoor firmware library.
//!
//! Exposes the pure-logic modules for integration testing and fuzzing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, with simulation stubs for host builds.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod buttons;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod lift;
pub mod pins;
pub mod tick;
pub mod ui;

pub mod adapters;
pub mod drivers;
