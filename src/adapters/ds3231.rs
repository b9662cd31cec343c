//! DS3231 real-time clock over I²C.
//!
//! Implements [`ClockPort`]. Time and alarm registers are BCD; the chip runs
//! in 24-hour mode. Alarm 1 matches hour, minute and second once a day.
//! Alarm 2 has no seconds register, so it matches hour and minute and fires
//! at second zero.

use embedded_hal::i2c::I2c;
use log::debug;

use crate::alarm::AlarmSlot;
use crate::app::ports::ClockPort;
use crate::clock::ClockTime;
use crate::error::ClockError;

pub const DS3231_ADDR: u8 = 0x68;

const REG_TIME: u8 = 0x00;
const REG_ALARM1: u8 = 0x07;
const REG_ALARM2: u8 = 0x0B;
const REG_CONTROL: u8 = 0x0E;
const REG_STATUS: u8 = 0x0F;

const CTRL_A1IE: u8 = 0x01;
const CTRL_A2IE: u8 = 0x02;
const CTRL_INTCN: u8 = 0x04;
const CTRL_BBSQW: u8 = 0x40;

const STATUS_A1F: u8 = 0x01;
const STATUS_A2F: u8 = 0x02;

/// A1M4 / A2M4: ignore the day-of-month field.
const MATCH_DAILY: u8 = 0x80;
const CENTURY: u8 = 0x80;

pub fn to_bcd(v: u8) -> u8 {
    ((v / 10) << 4) | (v % 10)
}

pub fn from_bcd(v: u8) -> u8 {
    (v >> 4) * 10 + (v & 0x0F)
}

fn flag_bits(slot: AlarmSlot) -> (u8, u8) {
    match slot {
        AlarmSlot::Open => (STATUS_A1F, CTRL_A1IE),
        AlarmSlot::Close => (STATUS_A2F, CTRL_A2IE),
    }
}

pub struct Ds3231<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DS3231_ADDR,
        }
    }

    pub fn into_inner(self) -> I2C {
        self.i2c
    }

    fn write_regs(&mut self, reg: u8, vals: &[u8]) -> Result<(), ClockError> {
        let mut buf = [0u8; 8];
        let n = vals.len().min(buf.len() - 1);
        buf[0] = reg;
        buf[1..=n].copy_from_slice(&vals[..n]);
        self.i2c
            .write(self.address, &buf[..=n])
            .map_err(|_| ClockError::Bus)
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, ClockError> {
        let mut out = [0u8];
        self.i2c
            .write_read(self.address, &[reg], &mut out)
            .map_err(|_| ClockError::Bus)?;
        Ok(out[0])
    }

    fn update_reg(&mut self, reg: u8, clear: u8, set: u8) -> Result<(), ClockError> {
        let v = self.read_reg(reg)?;
        self.write_regs(reg, &[(v & !clear) | set])
    }
}

impl<I2C: I2c> ClockPort for Ds3231<I2C> {
    fn now(&mut self) -> Result<ClockTime, ClockError> {
        let mut r = [0u8; 7];
        self.i2c
            .write_read(self.address, &[REG_TIME], &mut r)
            .map_err(|_| ClockError::Bus)?;

        let month_reg = r[5];
        let century = if month_reg & CENTURY != 0 { 2100 } else { 2000 };
        let t = ClockTime {
            second: from_bcd(r[0] & 0x7F),
            minute: from_bcd(r[1] & 0x7F),
            hour: from_bcd(r[2] & 0x3F),
            day: from_bcd(r[4] & 0x3F),
            month: from_bcd(month_reg & 0x1F),
            year: century + u16::from(from_bcd(r[6])),
        };
        if !t.is_valid_time_of_day() || t.month == 0 || t.month > 12 || t.day == 0 {
            return Err(ClockError::InvalidData);
        }
        Ok(t)
    }

    fn set_time(&mut self, t: &ClockTime) -> Result<(), ClockError> {
        let year = t.year.clamp(2000, 2199);
        let century = if year >= 2100 { CENTURY } else { 0 };
        let yy = (year % 100) as u8;
        // Weekday register is unused; 1 keeps it in range.
        self.write_regs(
            REG_TIME,
            &[
                to_bcd(t.second),
                to_bcd(t.minute),
                to_bcd(t.hour),
                1,
                to_bcd(t.day),
                to_bcd(t.month) | century,
                to_bcd(yy),
            ],
        )
    }

    fn arm_alarm(&mut self, slot: AlarmSlot, hour: u8, minute: u8, second: u8) -> Result<(), ClockError> {
        debug!("DS3231: arm {} at {:02}:{:02}:{:02}", slot, hour, minute, second);
        match slot {
            AlarmSlot::Open => self.write_regs(
                REG_ALARM1,
                &[to_bcd(second), to_bcd(minute), to_bcd(hour), MATCH_DAILY | 1],
            ),
            AlarmSlot::Close => {
                self.write_regs(REG_ALARM2, &[to_bcd(minute), to_bcd(hour), MATCH_DAILY | 1])
            }
        }
    }

    fn clear_alarm_flag(&mut self, slot: AlarmSlot) -> Result<bool, ClockError> {
        let (flag, _) = flag_bits(slot);
        let status = self.read_reg(REG_STATUS)?;
        if status & flag == 0 {
            return Ok(false);
        }
        // Flags are write-0-to-clear; write 1 to the other so a match that
        // lands between read and write stays pending.
        self.write_regs(REG_STATUS, &[(status | STATUS_A1F | STATUS_A2F) & !flag])?;
        Ok(true)
    }

    fn enable_alarm_interrupt(&mut self, slot: AlarmSlot, on: bool) -> Result<(), ClockError> {
        let (_, enable) = flag_bits(slot);
        if on {
            self.update_reg(REG_CONTROL, 0, enable | CTRL_INTCN)
        } else {
            self.update_reg(REG_CONTROL, enable, 0)
        }
    }

    /// INT/SQW pin becomes the alarm interrupt output.
    fn disable_square_wave(&mut self) -> Result<(), ClockError> {
        self.update_reg(REG_CONTROL, CTRL_BBSQW, CTRL_INTCN)
    }
}
