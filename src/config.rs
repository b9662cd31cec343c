//! Controller configuration parameters
//!
//! All tunable timing for the coop-door controller. Values are persisted in
//! the byte store next to the alarm slots and validated before use.

use serde::{Deserialize, Serialize};

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Tick ---
    /// Period of the hardware tick timer (milliseconds)
    pub tick_period_ms: u32,

    // --- Lift ---
    /// How long the lift motor runs after an alarm before a forced stop (milliseconds)
    pub hold_duration_ms: u32,
    /// Settle time between relay groups when changing direction (milliseconds)
    pub relay_settle_ms: u32,

    // --- UI ---
    /// Minimum spacing between two consumed keypad presses (milliseconds)
    pub ui_button_hold_ms: u32,

    // --- Timing ---
    /// Delay between foreground cycles (milliseconds)
    pub loop_interval_ms: u32,
    /// Boot-time window for entering the serial debug console (seconds)
    pub debug_window_secs: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1,

            hold_duration_ms: 4000,
            relay_settle_ms: 10,

            ui_button_hold_ms: 500,

            loop_interval_ms: 1000, // 1 Hz
            debug_window_secs: 3,
        }
    }
}

impl ControllerConfig {
    /// Hold duration expressed in scheduler ticks.
    pub fn hold_ticks(&self) -> u32 {
        self.hold_duration_ms / self.tick_period_ms.max(1)
    }

    /// UI gate threshold expressed in scheduler ticks.
    pub fn ui_hold_ticks(&self) -> u32 {
        self.ui_button_hold_ms / self.tick_period_ms.max(1)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(1..=10).contains(&self.tick_period_ms) {
            return Err("tick_period_ms must be 1–10");
        }
        if !(1000..=120_000).contains(&self.hold_duration_ms) {
            return Err("hold_duration_ms must be 1000–120000");
        }
        if !(1..=200).contains(&self.relay_settle_ms) {
            return Err("relay_settle_ms must be 1–200");
        }
        if !(50..=5000).contains(&self.ui_button_hold_ms) {
            return Err("ui_button_hold_ms must be 50–5000");
        }
        if !(10..=5000).contains(&self.loop_interval_ms) {
            return Err("loop_interval_ms must be 10–5000");
        }
        if self.debug_window_secs > 30 {
            return Err("debug_window_secs must be 0–30");
        }
        Ok(())
    }
}
