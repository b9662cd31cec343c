//! HD44780 16x2 character LCD, 4-bit parallel bus.
//!
//! Implements [`DisplayPort`]. Write-only: RW is tied low on the board, so
//! every command is followed by a fixed delay instead of a busy-flag poll.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;
use crate::ui::screen::{LCD_COLS, LCD_ROWS};

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY: u8 = 0x08;
const DISPLAY_ON: u8 = 0x04;
const CURSOR_BLINK: u8 = 0x01;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Pins in wiring order.
pub struct LcdPins<P> {
    pub rs: P,
    pub en: P,
    pub d4: P,
    pub d5: P,
    pub d6: P,
    pub d7: P,
}

pub struct Hd44780<P, D> {
    pins: LcdPins<P>,
    delay: D,
    display_ctrl: u8,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Run the 4-bit initialisation sequence and clear the screen.
    pub fn new(pins: LcdPins<P>, delay: D) -> Result<Self, DisplayError> {
        let mut lcd = Self {
            pins,
            delay,
            display_ctrl: CMD_DISPLAY | DISPLAY_ON,
        };

        lcd.delay.delay_ms(50);
        lcd.pins.rs.set_low().map_err(|_| DisplayError::Pin)?;
        // Three 8-bit "function set" nibbles, then switch to 4-bit.
        for wait_us in [4500, 4500, 150] {
            lcd.write_nibble(0x03)?;
            lcd.delay.delay_us(wait_us);
        }
        lcd.write_nibble(0x02)?;

        lcd.command(CMD_FUNCTION_4BIT_2LINE)?;
        lcd.command(lcd.display_ctrl)?;
        lcd.command(CMD_ENTRY_MODE)?;
        lcd.clear()?;
        Ok(lcd)
    }

    pub fn release(self) -> (LcdPins<P>, D) {
        (self.pins, self.delay)
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.pins.rs.set_low().map_err(|_| DisplayError::Pin)?;
        self.write_byte(cmd)?;
        self.delay.delay_us(if cmd == CMD_CLEAR { 2000 } else { 50 });
        Ok(())
    }

    fn data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.pins.rs.set_high().map_err(|_| DisplayError::Pin)?;
        self.write_byte(byte)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        let p = &mut self.pins;
        for (pin, bit) in [(&mut p.d4, 0), (&mut p.d5, 1), (&mut p.d6, 2), (&mut p.d7, 3)] {
            pin.set_state(((nibble >> bit) & 1 == 1).into())
                .map_err(|_| DisplayError::Pin)?;
        }
        p.en.set_high().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_us(1);
        self.pins.en.set_low().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_us(1);
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> DisplayPort for Hd44780<P, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if row >= LCD_ROWS || col as usize >= LCD_COLS {
            return Err(DisplayError::OutOfBounds);
        }
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row as usize] + col))
    }

    /// Non-ASCII characters are shown as `?`.
    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        for c in text.chars() {
            let byte = if c.is_ascii() { c as u8 } else { b'?' };
            self.data(byte)?;
        }
        Ok(())
    }

    fn set_blink(&mut self, on: bool) -> Result<(), DisplayError> {
        self.display_ctrl = if on {
            self.display_ctrl | CURSOR_BLINK
        } else {
            self.display_ctrl & !CURSOR_BLINK
        };
        self.command(self.display_ctrl)
    }
}
