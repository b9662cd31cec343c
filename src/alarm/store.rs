//! Alarm times: RTC registers, persisted copy and in-memory cache.
//!
//! Byte layout in the persistent store:
//!
//! ```text
//! addr  0..7   open slot   [epoch u32 LE][0 0 0]
//! addr  7..14  close slot  [epoch u32 LE][0 0 0]
//! ```
//!
//! The persisted copy is read once in [`AlarmStore::init`]; afterwards
//! [`AlarmStore::get`] serves the cache. Stored bytes are trusted as-is.

use log::{info, warn};

use super::AlarmSlot;
use crate::app::ports::{ClockPort, StoragePort};
use crate::clock::ClockTime;
use crate::error::{Error, Result};

/// Bytes per persisted slot.
pub const SLOT_LEN: usize = 7;
pub const OPEN_SLOT_ADDR: u16 = 0;
pub const CLOSE_SLOT_ADDR: u16 = 7;

pub const fn slot_addr(slot: AlarmSlot) -> u16 {
    match slot {
        AlarmSlot::Open => OPEN_SLOT_ADDR,
        AlarmSlot::Close => CLOSE_SLOT_ADDR,
    }
}

/// Only the time of day matters to an alarm. A date the epoch counter
/// cannot hold is folded onto 1970-01-01 so hour, minute and second survive.
pub fn encode_slot(time: &ClockTime) -> [u8; SLOT_LEN] {
    let mut secs = time.to_epoch_secs();
    let back = ClockTime::from_epoch_secs(secs);
    if (back.hour, back.minute, back.second) != (time.hour, time.minute, time.second) {
        secs = ClockTime::EPOCH
            .with_time_of_day(time.hour, time.minute, time.second)
            .to_epoch_secs();
    }
    let mut out = [0u8; SLOT_LEN];
    out[..4].copy_from_slice(&secs.to_le_bytes());
    out
}

/// Reserved trailing bytes are ignored.
pub fn decode_slot(bytes: &[u8; SLOT_LEN]) -> ClockTime {
    let secs = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    ClockTime::from_epoch_secs(secs)
}

pub struct AlarmStore {
    cache: [ClockTime; 2],
}

impl Default for AlarmStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmStore {
    pub fn new() -> Self {
        Self {
            cache: [ClockTime::EPOCH; 2],
        }
    }

    /// Load both slots from storage and re-program the RTC from them.
    ///
    /// Runs every step even if one fails; returns the first error seen.
    pub fn init(&mut self, hw: &mut (impl ClockPort + StoragePort)) -> Result<()> {
        let mut first_err = None;

        if let Err(e) = hw.disable_square_wave() {
            record(&mut first_err, e.into());
        }

        for slot in AlarmSlot::ALL {
            let mut raw = [0u8; SLOT_LEN];
            match hw.read_bytes(slot_addr(slot), &mut raw) {
                Ok(()) => self.cache[slot.index()] = decode_slot(&raw),
                Err(e) => record(&mut first_err, e.into()),
            }
            if let Err(e) = program_slot(hw, slot, &self.cache[slot.index()]) {
                record(&mut first_err, e);
            }
        }

        info!(
            "AlarmStore: open={:02}:{:02} close={:02}:{:02}",
            self.cache[0].hour, self.cache[0].minute, self.cache[1].hour, self.cache[1].minute
        );

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn get(&self, slot: AlarmSlot) -> ClockTime {
        self.cache[slot.index()]
    }

    /// Arm the RTC, then persist. The cache follows the RTC, so it is
    /// updated even when the storage write fails.
    pub fn set(
        &mut self,
        slot: AlarmSlot,
        time: &ClockTime,
        hw: &mut (impl ClockPort + StoragePort),
    ) -> Result<()> {
        program_slot(hw, slot, time)?;
        self.cache[slot.index()] = *time;
        hw.write_bytes(slot_addr(slot), &encode_slot(time))?;
        info!("Alarm {} set to {:02}:{:02}:{:02}", slot, time.hour, time.minute, time.second);
        Ok(())
    }
}

fn program_slot(clock: &mut impl ClockPort, slot: AlarmSlot, time: &ClockTime) -> Result<()> {
    clock.arm_alarm(slot, time.hour, time.minute, time.second)?;
    clock.clear_alarm_flag(slot)?;
    clock.enable_alarm_interrupt(slot, true)?;
    Ok(())
}

fn record(first: &mut Option<Error>, e: Error) {
    warn!("AlarmStore init: {}", e);
    first.get_or_insert(e);
}
