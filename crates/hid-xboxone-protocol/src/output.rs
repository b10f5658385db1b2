//! Xbox One GIP output command encoding.
//!
//! Two commands are supported: the one-shot init command written after the
//! interface is claimed, and the two-motor rumble command. Both layouts
//! follow the Linux `xpad` driver (`xboxone_init_packets` /
//! `xpad_play_effect`).

use padbridge_hid_common::ReportWriter;

/// Size of the post-claim init command.
pub const INIT_COMMAND_LEN: usize = 5;
/// Size of a GIP rumble command.
pub const RUMBLE_COMMAND_LEN: usize = 13;

/// The fixed 5-byte GIP start command.
///
/// Must be written once to the OUT endpoint after claiming the interface;
/// the controller sends no input reports until it arrives.
/// Layout: command `0x05` (power on), flags `0x20`, sequence, payload
/// length `0x01`, payload `0x00`.
pub const INIT_COMMAND: [u8; INIT_COMMAND_LEN] = [0x05, 0x20, 0x00, 0x01, 0x00];

/// Encode a GIP rumble command.
///
/// Layout (13 bytes): command `0x09`, flags `0x00`, sequence, payload
/// length `0x09`, mode `0x00`, motor mask `0x0F` (all four motors),
/// trigger motors left/right (unused, zero), left and right main motor
/// intensities, on-period `0xFF`, off-period `0x00`, repeat `0xFF`.
pub fn encode_rumble(seq: u8, left: u8, right: u8, out: &mut [u8; RUMBLE_COMMAND_LEN]) -> usize {
    let mut writer = ReportWriter::new(out);
    writer
        .write_u8(0x09)
        .write_u8(0x00)
        .write_u8(seq)
        .write_u8(0x09)
        .write_u8(0x00)
        .write_u8(0x0F)
        .skip(2) // trigger motors unused
        .write_u8(left)
        .write_u8(right)
        .write_u8(0xFF)
        .write_u8(0x00)
        .write_u8(0xFF);
    RUMBLE_COMMAND_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_command_bytes() {
        assert_eq!(INIT_COMMAND, [0x05, 0x20, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_rumble_layout() {
        let mut out = [0u8; RUMBLE_COMMAND_LEN];
        let len = encode_rumble(3, 0x80, 0x40, &mut out);
        assert_eq!(len, 13);
        assert_eq!(
            out,
            [0x09, 0x00, 0x03, 0x09, 0x00, 0x0F, 0x00, 0x00, 0x80, 0x40, 0xFF, 0x00, 0xFF]
        );
    }
}
