//! Fuzz target: `classify_button` with arbitrary thresholds
//!
//! Feeds arbitrary readings through arbitrary (possibly inverted) band
//! edges and asserts the result always agrees with the reset band.
//!
//! cargo fuzz run fuzz_keypad_classify

#![no_main]

use coopdoor::buttons::{ButtonId, ButtonThresholds, classify_button};
use libfuzzer_sys::fuzz_target;

fn word(data: &[u8], i: usize) -> u16 {
    let lo = data.get(2 * i).copied().unwrap_or(0);
    let hi = data.get(2 * i + 1).copied().unwrap_or(0);
    u16::from_le_bytes([lo, hi])
}

fuzz_target!(|data: &[u8]| {
    let t = ButtonThresholds {
        reset_above: word(data, 0),
        right_below: word(data, 1),
        up_below: word(data, 2),
        down_below: word(data, 3),
        left_below: word(data, 4),
        select_below: word(data, 5),
    };
    for i in 6..(data.len() / 2).max(6) {
        let reading = word(data, i);
        let id = classify_button(reading, &t);
        assert_eq!(id == ButtonId::Reset, reading > t.reset_above);
    }
});
