//! Analog keypad sampling.
//!
//! The keypad is a resistor ladder on one ADC pin: every button pulls the
//! line to a different voltage. [`classify_button`] maps one reading onto a
//! [`ButtonId`] with fixed threshold bands; there is no debouncing here, the
//! UI input gate rate-limits consumption instead.

use crate::app::ports::AnalogPort;

/// One keypad button, or none pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ButtonId {
    #[default]
    None = 0,
    Select = 1,
    Reset = 2,
    Up = 3,
    Down = 4,
    Left = 5,
    Right = 6,
}

impl ButtonId {
    /// Decode the raw value stored in the tick scheduler's atomic.
    /// Unknown values read as `None`.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Select,
            2 => Self::Reset,
            3 => Self::Up,
            4 => Self::Down,
            5 => Self::Left,
            6 => Self::Right,
            _ => Self::None,
        }
    }

    pub const fn is_pressed(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Band edges on a 10-bit reading.
///
/// `reset_above` is exclusive-low; the rest are exclusive-high and are tested
/// in ascending order, so each band starts where the previous one ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonThresholds {
    pub reset_above: u16,
    pub right_below: u16,
    pub up_below: u16,
    pub down_below: u16,
    pub left_below: u16,
    pub select_below: u16,
}

impl ButtonThresholds {
    /// Bands for the common 1602 keypad shield ladder.
    pub const KEYPAD_SHIELD: Self = Self {
        reset_above: 1050,
        right_below: 50,
        up_below: 250,
        down_below: 450,
        left_below: 650,
        select_below: 850,
    };
}

impl Default for ButtonThresholds {
    fn default() -> Self {
        Self::KEYPAD_SHIELD
    }
}

/// Classify one reading. Priority: Reset > Right > Up > Down > Left > Select > None.
pub fn classify_button(reading: u16, t: &ButtonThresholds) -> ButtonId {
    if reading > t.reset_above {
        ButtonId::Reset
    } else if reading < t.right_below {
        ButtonId::Right
    } else if reading < t.up_below {
        ButtonId::Up
    } else if reading < t.down_below {
        ButtonId::Down
    } else if reading < t.left_below {
        ButtonId::Left
    } else if reading < t.select_below {
        ButtonId::Select
    } else {
        ButtonId::None
    }
}

/// ADC-backed keypad: reads one channel and classifies it.
pub struct Keypad<A: AnalogPort> {
    adc: A,
    channel: u8,
    /// Right shift that brings the ADC's native width down to 10 bits.
    shift: u8,
    thresholds: ButtonThresholds,
}

impl<A: AnalogPort> Keypad<A> {
    /// `resolution_bits` is the ADC's native width (12 on ESP32-S3).
    pub fn new(adc: A, channel: u8, resolution_bits: u8) -> Self {
        Self {
            adc,
            channel,
            shift: resolution_bits.saturating_sub(10),
            thresholds: ButtonThresholds::KEYPAD_SHIELD,
        }
    }

    pub fn with_thresholds(mut self, thresholds: ButtonThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Read and classify. Never blocks beyond the ADC conversion.
    pub fn sample(&mut self) -> ButtonId {
        let raw = self.adc.read_channel(self.channel);
        classify_button(raw >> self.shift, &self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAdc(u16);

    impl AnalogPort for FixedAdc {
        fn read_channel(&mut self, _channel: u8) -> u16 {
            self.0
        }
    }

    fn classify(r: u16) -> ButtonId {
        classify_button(r, &ButtonThresholds::KEYPAD_SHIELD)
    }

    #[test]
    fn band_edges() {
        assert_eq!(classify(0), ButtonId::Right);
        assert_eq!(classify(49), ButtonId::Right);
        assert_eq!(classify(50), ButtonId::Up);
        assert_eq!(classify(249), ButtonId::Up);
        assert_eq!(classify(250), ButtonId::Down);
        assert_eq!(classify(450), ButtonId::Left);
        assert_eq!(classify(650), ButtonId::Select);
        assert_eq!(classify(849), ButtonId::Select);
        assert_eq!(classify(850), ButtonId::None);
        assert_eq!(classify(1050), ButtonId::None);
        assert_eq!(classify(1051), ButtonId::Reset);
        assert_eq!(classify(u16::MAX), ButtonId::Reset);
    }

    #[test]
    fn raw_roundtrip() {
        for b in [
            ButtonId::None,
            ButtonId::Select,
            ButtonId::Reset,
            ButtonId::Up,
            ButtonId::Down,
            ButtonId::Left,
            ButtonId::Right,
        ] {
            assert_eq!(ButtonId::from_raw(b as u8), b);
        }
        assert_eq!(ButtonId::from_raw(200), ButtonId::None);
    }

    #[test]
    fn keypad_scales_12_bit_reading() {
        // 12-bit 1400 -> 10-bit 350 -> Down
        let mut pad = Keypad::new(FixedAdc(1400), 3, 12);
        assert_eq!(pad.sample(), ButtonId::Down);
        // Idle ladder sits near full scale.
        let mut idle = Keypad::new(FixedAdc(4095), 3, 12);
        assert_eq!(idle.sample(), ButtonId::None);
    }

    #[test]
    fn keypad_with_custom_thresholds() {
        let t = ButtonThresholds {
            select_below: 1000,
            ..ButtonThresholds::KEYPAD_SHIELD
        };
        let mut pad = Keypad::new(FixedAdc(900), 0, 10).with_thresholds(t);
        assert_eq!(pad.sample(), ButtonId::Select);
    }
}
