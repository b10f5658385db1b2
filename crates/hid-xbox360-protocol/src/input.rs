//! Xbox 360 input report parsing.
//!
//! All functions are pure and allocation-free; parsing runs on the 1 kHz
//! poll path.

use crate::{MSG_LENGTH_INPUT, MSG_TYPE_INPUT, REPORT_SIZE_INPUT, Xbox360Error, Xbox360Result};
use padbridge_hid_common::ReportParser;
use padbridge_types::{CanonicalState, buttons, stick_to_u8};

/// Native button bits of the combined 16-bit button field
/// (`buttons_low | buttons_high << 8`).
pub mod native_buttons {
    pub const DPAD_UP: u16 = 1 << 0;
    pub const DPAD_DOWN: u16 = 1 << 1;
    pub const DPAD_LEFT: u16 = 1 << 2;
    pub const DPAD_RIGHT: u16 = 1 << 3;
    pub const START: u16 = 1 << 4;
    pub const BACK: u16 = 1 << 5;
    pub const LEFT_STICK: u16 = 1 << 6;
    pub const RIGHT_STICK: u16 = 1 << 7;
    pub const LB: u16 = 1 << 8;
    pub const RB: u16 = 1 << 9;
    pub const GUIDE: u16 = 1 << 10;
    // Bit 11 is unused on the wire.
    pub const A: u16 = 1 << 12;
    pub const B: u16 = 1 << 13;
    pub const X: u16 = 1 << 14;
    pub const Y: u16 = 1 << 15;
}

/// Parsed Xbox 360 input report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xbox360InputReport {
    /// Combined native button state (low byte | high byte << 8).
    pub buttons: u16,
    /// Left trigger, 0–255.
    pub left_trigger: u8,
    /// Right trigger, 0–255.
    pub right_trigger: u8,
    pub left_stick_x: i16,
    pub left_stick_y: i16,
    pub right_stick_x: i16,
    pub right_stick_y: i16,
}

impl Xbox360InputReport {
    /// Parse a 20-byte XUSB input report.
    ///
    /// # Errors
    ///
    /// Rejects short buffers and reports whose type/length header does not
    /// match an input report. A rejected report must not replace any cached
    /// state; the caller keeps its previous sample.
    pub fn parse(data: &[u8]) -> Xbox360Result<Self> {
        if data.len() < REPORT_SIZE_INPUT {
            return Err(Xbox360Error::InvalidReportSize {
                expected: REPORT_SIZE_INPUT,
                actual: data.len(),
            });
        }
        if data[0] != MSG_TYPE_INPUT || data[1] != MSG_LENGTH_INPUT {
            return Err(Xbox360Error::InvalidHeader {
                msg_type: data[0],
                msg_length: data[1],
            });
        }

        let mut parser = ReportParser::new(data);
        parser.skip(2);
        let buttons_low = parser.read_u8().map_err(|_| truncated(data.len()))?;
        let buttons_high = parser.read_u8().map_err(|_| truncated(data.len()))?;
        let left_trigger = parser.read_u8().map_err(|_| truncated(data.len()))?;
        let right_trigger = parser.read_u8().map_err(|_| truncated(data.len()))?;
        let left_stick_x = parser.read_i16_le().map_err(|_| truncated(data.len()))?;
        let left_stick_y = parser.read_i16_le().map_err(|_| truncated(data.len()))?;
        let right_stick_x = parser.read_i16_le().map_err(|_| truncated(data.len()))?;
        let right_stick_y = parser.read_i16_le().map_err(|_| truncated(data.len()))?;

        Ok(Self {
            buttons: u16::from(buttons_low) | (u16::from(buttons_high) << 8),
            left_trigger,
            right_trigger,
            left_stick_x,
            left_stick_y,
            right_stick_x,
            right_stick_y,
        })
    }

    pub fn button_pressed(&self, mask: u16) -> bool {
        self.buttons & mask != 0
    }

    /// Convert to the canonical state model.
    ///
    /// Sticks collapse from signed 16-bit to unsigned 8-bit; triggers pass
    /// through unchanged.
    pub fn to_canonical(&self) -> CanonicalState {
        let pairs = [
            (native_buttons::A, buttons::SOUTH),
            (native_buttons::B, buttons::EAST),
            (native_buttons::X, buttons::WEST),
            (native_buttons::Y, buttons::NORTH),
            (native_buttons::LB, buttons::L1),
            (native_buttons::RB, buttons::R1),
            (native_buttons::LEFT_STICK, buttons::L3),
            (native_buttons::RIGHT_STICK, buttons::R3),
            (native_buttons::START, buttons::START),
            (native_buttons::BACK, buttons::SELECT),
            (native_buttons::GUIDE, buttons::GUIDE),
            (native_buttons::DPAD_UP, buttons::DPAD_UP),
            (native_buttons::DPAD_DOWN, buttons::DPAD_DOWN),
            (native_buttons::DPAD_LEFT, buttons::DPAD_LEFT),
            (native_buttons::DPAD_RIGHT, buttons::DPAD_RIGHT),
        ];

        let mut out = 0u32;
        for (native, canonical) in pairs {
            if self.buttons & native != 0 {
                out |= canonical;
            }
        }

        CanonicalState {
            buttons: out,
            left_x: stick_to_u8(self.left_stick_x),
            left_y: stick_to_u8(self.left_stick_y),
            right_x: stick_to_u8(self.right_stick_x),
            right_y: stick_to_u8(self.right_stick_y),
            trigger_left: self.left_trigger,
            trigger_right: self.right_trigger,
        }
    }
}

fn truncated(actual: usize) -> Xbox360Error {
    Xbox360Error::InvalidReportSize {
        expected: REPORT_SIZE_INPUT,
        actual,
    }
}

/// Parse and convert in one step.
///
/// # Errors
///
/// See [`Xbox360InputReport::parse`].
pub fn decode(data: &[u8]) -> Xbox360Result<CanonicalState> {
    Ok(Xbox360InputReport::parse(data)?.to_canonical())
}
