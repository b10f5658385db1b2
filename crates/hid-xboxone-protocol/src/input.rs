//! Xbox One GIP input report parsing.
//!
//! All functions are pure and allocation-free.

use crate::{MSG_TYPE_INPUT, REPORT_SIZE_INPUT_MIN, TRIGGER_MAX, XboxOneError, XboxOneResult};
use padbridge_hid_common::ReportParser;
use padbridge_types::{CanonicalState, buttons, stick_to_u8};

/// Native bits of the low button byte (report byte 4).
pub mod buttons_low {
    pub const SYNC: u8 = 1 << 0;
    // Bit 1 unused.
    pub const MENU: u8 = 1 << 2;
    pub const VIEW: u8 = 1 << 3;
    pub const A: u8 = 1 << 4;
    pub const B: u8 = 1 << 5;
    pub const X: u8 = 1 << 6;
    pub const Y: u8 = 1 << 7;
}

/// Native bits of the high button byte (report byte 5).
pub mod buttons_high {
    pub const DPAD_UP: u8 = 1 << 0;
    pub const DPAD_DOWN: u8 = 1 << 1;
    pub const DPAD_LEFT: u8 = 1 << 2;
    pub const DPAD_RIGHT: u8 = 1 << 3;
    pub const LB: u8 = 1 << 4;
    pub const RB: u8 = 1 << 5;
    pub const LEFT_STICK: u8 = 1 << 6;
    pub const RIGHT_STICK: u8 = 1 << 7;
}

/// Convert a raw 10-bit trigger value to the canonical 8-bit range.
///
/// Divides by 4 (discarding the low two bits) — lossy by design and
/// reproducible: 1023 -> 255, 4 -> 1, 0 -> 0. Values above the 10-bit
/// range saturate at 255.
pub fn trigger_to_u8(raw: u16) -> u8 {
    (raw >> 2).min(255) as u8
}

/// Parsed Xbox One GIP input report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XboxOneInputReport {
    /// Rolling report counter from the header.
    pub counter: u8,
    pub buttons_low: u8,
    pub buttons_high: u8,
    /// Left trigger, raw 10-bit (0–1023).
    pub left_trigger: u16,
    /// Right trigger, raw 10-bit (0–1023).
    pub right_trigger: u16,
    pub left_stick_x: i16,
    pub left_stick_y: i16,
    pub right_stick_x: i16,
    pub right_stick_y: i16,
}

impl XboxOneInputReport {
    /// Parse a GIP input report (message type `0x20`, >= 18 bytes).
    ///
    /// # Errors
    ///
    /// Rejects short buffers and any non-`0x20` message (including the
    /// separate `0x07` guide-button report). A rejected report must not
    /// replace any cached state.
    pub fn parse(data: &[u8]) -> XboxOneResult<Self> {
        if data.len() < REPORT_SIZE_INPUT_MIN {
            return Err(XboxOneError::InvalidReportSize {
                expected: REPORT_SIZE_INPUT_MIN,
                actual: data.len(),
            });
        }
        if data[0] != MSG_TYPE_INPUT {
            return Err(XboxOneError::NotInputReport { msg_type: data[0] });
        }

        let mut parser = ReportParser::new(data);
        parser.skip(2); // message type + flags
        let counter = parser.read_u8().map_err(|_| truncated(data.len()))?;
        parser.skip(1); // payload length
        let low = parser.read_u8().map_err(|_| truncated(data.len()))?;
        let high = parser.read_u8().map_err(|_| truncated(data.len()))?;
        let left_trigger = parser.read_u16_le().map_err(|_| truncated(data.len()))?;
        let right_trigger = parser.read_u16_le().map_err(|_| truncated(data.len()))?;
        let left_stick_x = parser.read_i16_le().map_err(|_| truncated(data.len()))?;
        let left_stick_y = parser.read_i16_le().map_err(|_| truncated(data.len()))?;
        let right_stick_x = parser.read_i16_le().map_err(|_| truncated(data.len()))?;
        let right_stick_y = parser.read_i16_le().map_err(|_| truncated(data.len()))?;

        Ok(Self {
            counter,
            buttons_low: low,
            buttons_high: high,
            left_trigger,
            right_trigger,
            left_stick_x,
            left_stick_y,
            right_stick_x,
            right_stick_y,
        })
    }

    /// Convert to the canonical state model.
    ///
    /// The guide button is never set here; it lives in the separate `0x07`
    /// report, which this decoder does not consume.
    pub fn to_canonical(&self) -> CanonicalState {
        let mut out = 0u32;

        let low_pairs = [
            (buttons_low::A, buttons::SOUTH),
            (buttons_low::B, buttons::EAST),
            (buttons_low::X, buttons::WEST),
            (buttons_low::Y, buttons::NORTH),
            (buttons_low::MENU, buttons::START),
            (buttons_low::VIEW, buttons::SELECT),
        ];
        for (native, canonical) in low_pairs {
            if self.buttons_low & native != 0 {
                out |= canonical;
            }
        }

        let high_pairs = [
            (buttons_high::DPAD_UP, buttons::DPAD_UP),
            (buttons_high::DPAD_DOWN, buttons::DPAD_DOWN),
            (buttons_high::DPAD_LEFT, buttons::DPAD_LEFT),
            (buttons_high::DPAD_RIGHT, buttons::DPAD_RIGHT),
            (buttons_high::LB, buttons::L1),
            (buttons_high::RB, buttons::R1),
            (buttons_high::LEFT_STICK, buttons::L3),
            (buttons_high::RIGHT_STICK, buttons::R3),
        ];
        for (native, canonical) in high_pairs {
            if self.buttons_high & native != 0 {
                out |= canonical;
            }
        }

        CanonicalState {
            buttons: out,
            left_x: stick_to_u8(self.left_stick_x),
            left_y: stick_to_u8(self.left_stick_y),
            right_x: stick_to_u8(self.right_stick_x),
            right_y: stick_to_u8(self.right_stick_y),
            trigger_left: trigger_to_u8(self.left_trigger),
            trigger_right: trigger_to_u8(self.right_trigger),
        }
    }
}

fn truncated(actual: usize) -> XboxOneError {
    XboxOneError::InvalidReportSize {
        expected: REPORT_SIZE_INPUT_MIN,
        actual,
    }
}

/// Parse and convert in one step.
///
/// # Errors
///
/// See [`XboxOneInputReport::parse`].
pub fn decode(data: &[u8]) -> XboxOneResult<CanonicalState> {
    Ok(XboxOneInputReport::parse(data)?.to_canonical())
}
