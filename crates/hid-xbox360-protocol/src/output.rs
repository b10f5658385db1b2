//! Xbox 360 output report encoding: two-motor rumble and the ring-of-light
//! player indicator. Delivery is fire-and-forget.

use crate::{REPORT_SIZE_LED, REPORT_SIZE_RUMBLE};
use padbridge_hid_common::ReportWriter;

/// LED command value for "quadrant N steady on"; add the 0-based player
/// index (0x06 = player 1 through 0x09 = player 4).
const LED_STEADY_BASE: u8 = 0x06;

/// Encode a rumble output report.
///
/// Layout (8 bytes):
/// - Byte 0: `0x00` (message type)
/// - Byte 1: `0x08` (message length)
/// - Byte 2: padding
/// - Byte 3: left (large, low-frequency) motor intensity
/// - Byte 4: right (small, high-frequency) motor intensity
/// - Bytes 5–7: padding
pub fn encode_rumble(left: u8, right: u8, out: &mut [u8; REPORT_SIZE_RUMBLE]) -> usize {
    let mut writer = ReportWriter::new(out);
    writer
        .write_u8(0x00)
        .write_u8(REPORT_SIZE_RUMBLE as u8)
        .skip(1)
        .write_u8(left)
        .write_u8(right);
    REPORT_SIZE_RUMBLE
}

/// Encode the player-indicator LED report for a 0-based player index.
///
/// Layout (3 bytes): `0x01` (message type), `0x03` (message length), LED
/// command. Indices past 3 wrap onto the four quadrants.
pub fn encode_player_led(player: u8, out: &mut [u8; REPORT_SIZE_LED]) -> usize {
    let mut writer = ReportWriter::new(out);
    writer
        .write_u8(0x01)
        .write_u8(REPORT_SIZE_LED as u8)
        .write_u8(LED_STEADY_BASE + (player & 0x03));
    REPORT_SIZE_LED
}
