//! 1 ms tick scheduler shared between the timer callback and the foreground.
//!
//! ```text
//!  timer ctx (1 kHz)                      foreground (1 Hz)
//!  ─────────────────                      ─────────────────
//!  pending == None ? sample()  ──► pending_button ──► InputGate::poll
//!  ui_delaying ? ui_delay += 1 ◄── ui_delaying    ◄── InputGate::poll
//!  hold_active ? hold += 1     ◄── start/stop_hold ◄── LiftSequencer
//! ```
//!
//! Every field is a single atomic word with one writer per direction, so no
//! locks are needed and the callback never blocks.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::buttons::ButtonId;

/// The scheduler instance ticked by `drivers::hw_timer`.
pub static TICKS: TickScheduler = TickScheduler::new();

pub struct TickScheduler {
    pending_button: AtomicU8,
    ui_delaying: AtomicBool,
    ui_delay_ticks: AtomicU32,
    hold_active: AtomicBool,
    hold_elapsed: AtomicU32,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    pub const fn new() -> Self {
        Self {
            pending_button: AtomicU8::new(ButtonId::None as u8),
            ui_delaying: AtomicBool::new(false),
            ui_delay_ticks: AtomicU32::new(0),
            hold_active: AtomicBool::new(false),
            hold_elapsed: AtomicU32::new(0),
        }
    }

    /// One scheduler tick. `sample` is only called when no press is pending.
    pub fn tick(&self, sample: impl FnOnce() -> ButtonId) {
        if self.pending_button() == ButtonId::None {
            self.pending_button.store(sample() as u8, Ordering::Release);
        }
        if self.ui_delaying.load(Ordering::Acquire) {
            self.ui_delay_ticks.fetch_add(1, Ordering::AcqRel);
        }
        if self.hold_active.load(Ordering::Acquire) {
            self.hold_elapsed.fetch_add(1, Ordering::AcqRel);
        }
    }

    // ── Button sample ─────────────────────────────────────────

    pub fn pending_button(&self) -> ButtonId {
        ButtonId::from_raw(self.pending_button.load(Ordering::Acquire))
    }

    /// Consume the pending press, leaving `None` so the next tick samples again.
    pub fn take_pending_button(&self) -> ButtonId {
        ButtonId::from_raw(self.pending_button.swap(ButtonId::None as u8, Ordering::AcqRel))
    }

    // ── UI delay gate ─────────────────────────────────────────

    pub fn ui_delaying(&self) -> bool {
        self.ui_delaying.load(Ordering::Acquire)
    }

    pub fn set_ui_delaying(&self, delaying: bool) {
        self.ui_delaying.store(delaying, Ordering::Release);
    }

    pub fn ui_delay_ticks(&self) -> u32 {
        self.ui_delay_ticks.load(Ordering::Acquire)
    }

    pub fn reset_ui_delay(&self) {
        self.ui_delay_ticks.store(0, Ordering::Release);
    }

    // ── Relay hold timer ──────────────────────────────────────

    /// Restart the hold window from zero.
    pub fn start_hold(&self) {
        self.hold_elapsed.store(0, Ordering::Release);
        self.hold_active.store(true, Ordering::Release);
    }

    pub fn stop_hold(&self) {
        self.hold_active.store(false, Ordering::Release);
        self.hold_elapsed.store(0, Ordering::Release);
    }

    pub fn hold_active(&self) -> bool {
        self.hold_active.load(Ordering::Acquire)
    }

    pub fn hold_elapsed(&self) -> u32 {
        self.hold_elapsed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_tick_changes_nothing() {
        let s = TickScheduler::new();
        for _ in 0..100 {
            s.tick(|| ButtonId::None);
        }
        assert_eq!(s.pending_button(), ButtonId::None);
        assert_eq!(s.ui_delay_ticks(), 0);
        assert_eq!(s.hold_elapsed(), 0);
    }

    #[test]
    fn pending_press_is_not_overwritten() {
        let s = TickScheduler::new();
        s.tick(|| ButtonId::Up);
        let mut sampled = false;
        s.tick(|| {
            sampled = true;
            ButtonId::Down
        });
        assert!(!sampled, "sampler must not run while a press is pending");
        assert_eq!(s.pending_button(), ButtonId::Up);
    }

    #[test]
    fn take_clears_pending() {
        let s = TickScheduler::new();
        s.tick(|| ButtonId::Select);
        assert_eq!(s.take_pending_button(), ButtonId::Select);
        assert_eq!(s.pending_button(), ButtonId::None);
        s.tick(|| ButtonId::Left);
        assert_eq!(s.pending_button(), ButtonId::Left);
    }

    #[test]
    fn ui_delay_counts_only_while_delaying() {
        let s = TickScheduler::new();
        s.tick(|| ButtonId::None);
        assert_eq!(s.ui_delay_ticks(), 0);
        s.set_ui_delaying(true);
        for _ in 0..7 {
            s.tick(|| ButtonId::None);
        }
        assert_eq!(s.ui_delay_ticks(), 7);
        s.set_ui_delaying(false);
        s.tick(|| ButtonId::None);
        assert_eq!(s.ui_delay_ticks(), 7);
        s.reset_ui_delay();
        assert_eq!(s.ui_delay_ticks(), 0);
    }

    #[test]
    fn hold_counts_while_active_and_restarts() {
        let s = TickScheduler::new();
        s.start_hold();
        for _ in 0..10 {
            s.tick(|| ButtonId::None);
        }
        assert!(s.hold_active());
        assert_eq!(s.hold_elapsed(), 10);

        s.start_hold();
        assert_eq!(s.hold_elapsed(), 0);

        s.stop_hold();
        s.tick(|| ButtonId::None);
        assert!(!s.hold_active());
        assert_eq!(s.hold_elapsed(), 0);
    }
}
