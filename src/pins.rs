//! Board wiring for the coop-door controller (ESP32-S3).
//!
//! `esp-idf-hal` hands out each pin as its own typed object, so `main.rs`
//! takes them by name and the GPIO numbers below are documentation only:
//!
//! ```text
//! GPIO 4..7    relays K1 extend, K2 retract, K3 supply, K4 direction
//! GPIO 8..13   LCD RS, EN, D4..D7 (HD44780, 4-bit bus)
//! GPIO 1       keypad resistor ladder (ADC1 channel 0)
//! GPIO 14, 15  I2C SDA, SCL to the DS3231
//! GPIO 16      DS3231 INT/SQW
//! GPIO 43, 44  UART0 TX, RX debug console
//! ```
//!
//! The constants are the values drivers read at run time.

/// The opto-isolated relay board switches on a LOW input.
pub const RELAYS_ACTIVE_LOW: bool = true;

pub const KEYPAD_ADC_CHANNEL: u8 = 0;
/// Native ADC width; readings are shifted down to 10 bits before classifying.
pub const KEYPAD_ADC_BITS: u8 = 12;

pub const I2C_BAUD_HZ: u32 = 100_000;

/// INT/SQW output: open-drain, active LOW, needs the internal pull-up.
/// Configured by raw number in `hw_init`, unlike the pins above.
pub const RTC_INT_GPIO: i32 = 16;

pub const UART_BAUD: u32 = 115_200;
