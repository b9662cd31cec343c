//! Calendar time used by the clock, the alarm slots and the edit buffer.
//!
//! [`ClockTime`] is a broken-down UTC-less wall time. It converts to and from
//! a `u32` count of seconds since 1970-01-01 00:00:00, which is the form the
//! alarm slots are persisted in.

use core::fmt;
use serde::{Deserialize, Serialize};

const SECS_PER_DAY: u32 = 86_400;

/// Days between 0000-03-01 and 1970-01-01 in the proleptic Gregorian calendar.
const DAYS_TO_UNIX_EPOCH: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl ClockTime {
    pub const EPOCH: Self = Self::new(1970, 1, 1, 0, 0, 0);

    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Break an epoch counter into calendar fields.
    pub fn from_epoch_secs(secs: u32) -> Self {
        let days = i64::from(secs / SECS_PER_DAY);
        let rem = secs % SECS_PER_DAY;
        let (year, month, day) = civil_from_days(days);
        Self {
            year: year as u16,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: (rem / 60 % 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Fold calendar fields back into an epoch counter.
    ///
    /// Dates before 1970 clamp to zero and dates past 2106-02-07 saturate,
    /// so a corrupted buffer never panics.
    pub fn to_epoch_secs(&self) -> u32 {
        let month = self.month.clamp(1, 12);
        let day = self.day.clamp(1, 31);
        let days = days_from_civil(i64::from(self.year), month, day);
        let secs = days * i64::from(SECS_PER_DAY)
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second);
        secs.clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Same date, different time of day.
    pub fn with_time_of_day(self, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            ..self
        }
    }

    pub fn is_valid_time_of_day(&self) -> bool {
        self.hour < 24 && self.minute < 60 && self.second < 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

// Howard Hinnant's civil calendar algorithms, restricted to non-negative eras.

fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (i64::from(month) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * DAYS_PER_ERA + doe - DAYS_TO_UNIX_EPOCH
}

fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + DAYS_TO_UNIX_EPOCH;
    let era = z.div_euclid(DAYS_PER_ERA);
    let doe = z - era * DAYS_PER_ERA;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
