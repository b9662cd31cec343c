//! Fuzz target: persisted alarm slot decoding
//!
//! Any 7 bytes read back from storage must decode to a valid time of day,
//! and re-encoding must reproduce the timestamp bytes.
//!
//! cargo fuzz run fuzz_slot_decode

#![no_main]

use coopdoor::alarm::store::{SLOT_LEN, decode_slot, encode_slot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some(chunk) = data.get(..SLOT_LEN) else {
        return;
    };
    let mut raw = [0u8; SLOT_LEN];
    raw.copy_from_slice(chunk);

    let t = decode_slot(&raw);
    assert!(t.is_valid_time_of_day());
    assert_eq!(encode_slot(&t)[..4], raw[..4]);
});
