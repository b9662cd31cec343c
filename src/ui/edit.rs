//! Digit-wise time editing with wraparound.
//!
//! Each keypad step changes one displayed digit of `HH:MM` while keeping the
//! hour in 0..=23 and the minute in 0..=59. Tens steps that would leave the
//! range wrap back into it instead (23 + tens-up is 03, 00 - tens-down is 20).

use super::Digit;
use crate::clock::ClockTime;

pub fn hour_tens_up(h: u8) -> u8 {
    match h {
        0..=13 => h + 10,
        14..=19 => h - 10,
        _ => h - 20,
    }
}

pub fn hour_tens_down(h: u8) -> u8 {
    match h {
        0..=3 => h + 20,
        4..=9 => h + 10,
        _ => h - 10,
    }
}

pub fn hour_ones_up(h: u8) -> u8 {
    match h {
        9 | 19 => h - 9,
        23 => 20,
        _ => h + 1,
    }
}

pub fn hour_ones_down(h: u8) -> u8 {
    match h {
        0 | 10 => h + 9,
        20 => 23,
        _ => h - 1,
    }
}

pub fn minute_tens_up(m: u8) -> u8 {
    if m >= 50 { m - 50 } else { m + 10 }
}

pub fn minute_tens_down(m: u8) -> u8 {
    if m < 10 { m + 50 } else { m - 10 }
}

pub fn minute_ones_up(m: u8) -> u8 {
    if m % 10 == 9 { m - 9 } else { m + 1 }
}

pub fn minute_ones_down(m: u8) -> u8 {
    if m % 10 == 0 { m + 9 } else { m - 1 }
}

/// Step one digit of the buffer. Out-of-range fields are folded back into
/// range first so a corrupt buffer cannot overflow.
pub fn step(buffer: &mut ClockTime, digit: Digit, up: bool) {
    let h = buffer.hour % 24;
    let m = buffer.minute % 60;
    match (digit, up) {
        (Digit::HourTens, true) => buffer.hour = hour_tens_up(h),
        (Digit::HourTens, false) => buffer.hour = hour_tens_down(h),
        (Digit::HourOnes, true) => buffer.hour = hour_ones_up(h),
        (Digit::HourOnes, false) => buffer.hour = hour_ones_down(h),
        (Digit::MinuteTens, true) => buffer.minute = minute_tens_up(m),
        (Digit::MinuteTens, false) => buffer.minute = minute_tens_down(m),
        (Digit::MinuteOnes, true) => buffer.minute = minute_ones_up(m),
        (Digit::MinuteOnes, false) => buffer.minute = minute_ones_down(m),
    }
}
