//! What the 16x2 LCD shows for one UI state.

use core::fmt::Write;

use heapless::String;

use crate::app::ports::DisplayPort;
use crate::clock::ClockTime;
use crate::error::DisplayError;

pub const LCD_COLS: usize = 16;
pub const LCD_ROWS: u8 = 2;

/// Row 0 carries the caption, row 1 the `HH:MM` value. In edit states the
/// cursor blinks under the digit being changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: &'static str,
    pub value: String<LCD_COLS>,
    pub cursor: Option<u8>,
}

impl Screen {
    pub fn new(title: &'static str, time: &ClockTime, cursor: Option<u8>) -> Self {
        let mut value = String::new();
        // Five characters always fit.
        let _ = write!(value, "{:02}:{:02}", time.hour, time.minute);
        Self {
            title,
            value,
            cursor,
        }
    }

    pub fn draw(&self, display: &mut impl DisplayPort) -> Result<(), DisplayError> {
        display.clear()?;
        display.set_cursor(0, 0)?;
        display.write_str(self.title)?;
        display.set_cursor(0, 1)?;
        display.write_str(&self.value)?;
        match self.cursor {
            Some(col) => {
                display.set_cursor(col, 1)?;
                display.set_blink(true)
            }
            None => display.set_blink(false),
        }
    }
}
