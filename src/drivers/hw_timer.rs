//! Tick timer using ESP-IDF's esp_timer API.
//!
//! One periodic timer drives [`TICKS`](crate::tick::TICKS) at
//! `tick_period_ms`. The callback samples the keypad only while no press
//! is pending, then advances the UI and hold counters. It never logs.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! the ADC oneshot read is allowed there.

use crate::buttons::Keypad;
use crate::drivers::hw_init::{AdcKeypadInput, HwInitError};
use crate::tick::TickScheduler;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// Body of one tick: the only code that runs in timer context.
pub fn run_tick(ticks: &TickScheduler, keypad: &mut Keypad<AdcKeypadInput>) {
    ticks.tick(|| keypad.sample());
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the leaked keypad from `start_tick_timer()`; the
    // timer task is its only user.
    let keypad = unsafe { &mut *arg.cast::<Keypad<AdcKeypadInput>>() };
    run_tick(&crate::tick::TICKS, keypad);
}

/// Start the periodic tick timer. The keypad moves into timer context.
///
/// Without ticks the hold window never closes, so a failure here must stop
/// the boot rather than leave the lift unbounded.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(keypad: Keypad<AdcKeypadInput>, period_ms: u32) -> Result<(), HwInitError> {
    let keypad = Box::into_raw(Box::new(keypad));
    // SAFETY: TICK_TIMER is written here once at boot from the single
    // main-task context before the first callback fires. On failure no
    // callback ever ran, so the keypad box is reclaimed exactly once.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: keypad.cast::<core::ffi::c_void>(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"tick\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK as i32 {
            drop(Box::from_raw(keypad));
            return Err(HwInitError::TimerStartFailed(ret));
        }
        let ret = esp_timer_start_periodic(TICK_TIMER, u64::from(period_ms) * 1_000);
        if ret != ESP_OK as i32 {
            esp_timer_delete(TICK_TIMER);
            drop(Box::from_raw(keypad));
            return Err(HwInitError::TimerStartFailed(ret));
        }
    }
    info!("hw_timer: tick@{}ms started", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(_keypad: Keypad<AdcKeypadInput>, _period_ms: u32) -> Result<(), HwInitError> {
    log::info!("hw_timer(sim): tick timer not started (ticks driven by tests)");
    Ok(())
}
