//! Switch input-only report parsing.
//!
//! All functions are pure and allocation-free.

use crate::{REPORT_SIZE_INPUT, SwitchError, SwitchResult};
use padbridge_types::{CanonicalState, buttons, dpad_from_hat};

/// Native bits of button byte 0.
pub mod buttons0 {
    /// Y — west position.
    pub const Y: u8 = 0x01;
    /// B — south position.
    pub const B: u8 = 0x02;
    /// A — east position.
    pub const A: u8 = 0x04;
    /// X — north position.
    pub const X: u8 = 0x08;
    pub const L: u8 = 0x10;
    pub const R: u8 = 0x20;
    /// Digital left trigger.
    pub const ZL: u8 = 0x40;
    /// Digital right trigger.
    pub const ZR: u8 = 0x80;
}

/// Native bits of button byte 1.
pub mod buttons1 {
    pub const MINUS: u8 = 0x01;
    pub const PLUS: u8 = 0x02;
    pub const LEFT_STICK: u8 = 0x04;
    pub const RIGHT_STICK: u8 = 0x08;
    pub const HOME: u8 = 0x10;
    pub const CAPTURE: u8 = 0x20;
}

/// Parsed input-only pad report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchInputReport {
    pub buttons0: u8,
    pub buttons1: u8,
    /// Hat value: 0–7 compass clockwise from North, >= 8 centered.
    pub hat: u8,
    pub left_stick_x: u8,
    pub left_stick_y: u8,
    pub right_stick_x: u8,
    pub right_stick_y: u8,
}

impl SwitchInputReport {
    /// Parse a 7-byte input-only report. Length is the only validation
    /// this family defines.
    ///
    /// # Errors
    ///
    /// Rejects buffers shorter than 7 bytes.
    pub fn parse(data: &[u8]) -> SwitchResult<Self> {
        if data.len() < REPORT_SIZE_INPUT {
            return Err(SwitchError::InvalidReportSize {
                expected: REPORT_SIZE_INPUT,
                actual: data.len(),
            });
        }
        Ok(Self {
            buttons0: data[0],
            buttons1: data[1],
            hat: data[2],
            left_stick_x: data[3],
            left_stick_y: data[4],
            right_stick_x: data[5],
            right_stick_y: data[6],
        })
    }

    /// Convert to the canonical state model.
    ///
    /// Switch face labels are positional: B sits south, A east, Y west,
    /// X north. Digital ZL/ZR become trigger values 0 or 255 so the
    /// translator's digital-trigger threshold applies uniformly across
    /// families.
    pub fn to_canonical(&self) -> CanonicalState {
        let mut out = 0u32;

        let pairs0 = [
            (buttons0::B, buttons::SOUTH),
            (buttons0::A, buttons::EAST),
            (buttons0::Y, buttons::WEST),
            (buttons0::X, buttons::NORTH),
            (buttons0::L, buttons::L1),
            (buttons0::R, buttons::R1),
        ];
        for (native, canonical) in pairs0 {
            if self.buttons0 & native != 0 {
                out |= canonical;
            }
        }

        let pairs1 = [
            (buttons1::PLUS, buttons::START),
            (buttons1::MINUS, buttons::SELECT),
            (buttons1::HOME, buttons::GUIDE),
            (buttons1::CAPTURE, buttons::CAPTURE),
            (buttons1::LEFT_STICK, buttons::L3),
            (buttons1::RIGHT_STICK, buttons::R3),
        ];
        for (native, canonical) in pairs1 {
            if self.buttons1 & native != 0 {
                out |= canonical;
            }
        }

        out |= dpad_from_hat(self.hat);

        CanonicalState {
            buttons: out,
            left_x: self.left_stick_x,
            left_y: self.left_stick_y,
            right_x: self.right_stick_x,
            right_y: self.right_stick_y,
            trigger_left: if self.buttons0 & buttons0::ZL != 0 { 255 } else { 0 },
            trigger_right: if self.buttons0 & buttons0::ZR != 0 { 255 } else { 0 },
        }
    }
}

/// Parse and convert in one step.
///
/// # Errors
///
/// See [`SwitchInputReport::parse`].
pub fn decode(data: &[u8]) -> SwitchResult<CanonicalState> {
    Ok(SwitchInputReport::parse(data)?.to_canonical())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HAT_CENTERED;

    fn neutral_report() -> [u8; 7] {
        [0x00, 0x00, HAT_CENTERED, 128, 128, 128, 128]
    }

    #[test]
    fn test_neutral_report_decodes_centered() {
        let state = decode(&neutral_report()).expect("decode");
        assert_eq!(state.buttons, 0);
        assert_eq!(state.left_x, 128);
        assert_eq!(state.right_y, 128);
        assert_eq!(state.trigger_left, 0);
        assert_eq!(state.trigger_right, 0);
    }

    #[test]
    fn test_short_report_rejected() {
        assert_eq!(
            SwitchInputReport::parse(&[0u8; 6]),
            Err(SwitchError::InvalidReportSize {
                expected: 7,
                actual: 6
            })
        );
    }

    #[test]
    fn test_positional_face_mapping() {
        let mut data = neutral_report();
        data[0] = buttons0::B | buttons0::X;
        let state = decode(&data).expect("decode");
        assert_eq!(state.buttons, buttons::SOUTH | buttons::NORTH);
    }

    #[test]
    fn test_digital_triggers_become_full_scale() {
        let mut data = neutral_report();
        data[0] = buttons0::ZL;
        let state = decode(&data).expect("decode");
        assert_eq!(state.trigger_left, 255);
        assert_eq!(state.trigger_right, 0);
        // ZL/ZR never appear as canonical button bits from the decoder.
        assert_eq!(state.buttons & (buttons::L2 | buttons::R2), 0);
    }

    #[test]
    fn test_hat_diagonal() {
        let mut data = neutral_report();
        data[2] = 3; // south-east
        let state = decode(&data).expect("decode");
        assert_eq!(state.dpad(), buttons::DPAD_DOWN | buttons::DPAD_RIGHT);
    }

    #[test]
    fn test_home_and_capture() {
        let mut data = neutral_report();
        data[1] = buttons1::HOME | buttons1::CAPTURE;
        let state = decode(&data).expect("decode");
        assert_eq!(state.buttons, buttons::GUIDE | buttons::CAPTURE);
    }

    #[test]
    fn test_sticks_pass_through() {
        let mut data = neutral_report();
        data[3] = 0;
        data[4] = 255;
        let state = decode(&data).expect("decode");
        assert_eq!(state.left_x, 0);
        assert_eq!(state.left_y, 255);
    }
}
