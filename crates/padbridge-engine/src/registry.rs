//! Device registry: VID/PID classification and per-family decode dispatch.
//!
//! Classification happens once, when a device is first seen; per-report
//! decoding dispatches on the resulting [`ControllerFamily`] tag instead of
//! re-examining the device.

use hid_switch_wired_protocol::SwitchError;
use hid_xbox360_protocol::Xbox360Error;
use hid_xboxone_protocol::XboxOneError;
use padbridge_types::{CanonicalState, ControllerFamily};
use thiserror::Error;

/// A report failed family-specific validation. The caller keeps its
/// previously cached sample; nothing is mutated on rejection.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Xbox360(#[from] Xbox360Error),

    #[error(transparent)]
    XboxOne(#[from] XboxOneError),

    #[error(transparent)]
    Switch(#[from] SwitchError),

    #[error("No decoder for unclassified device")]
    UnsupportedFamily,
}

/// Classify a device by its USB identity.
///
/// Pure static-table lookup; `ControllerFamily::None` means the device is
/// not a supported controller and is skipped, not an error.
pub fn detect(vendor_id: u16, product_id: u16) -> ControllerFamily {
    if hid_xbox360_protocol::is_xbox360_device(vendor_id, product_id) {
        ControllerFamily::Xbox360
    } else if hid_xboxone_protocol::is_xboxone_device(vendor_id, product_id) {
        ControllerFamily::XboxOne
    } else if hid_switch_wired_protocol::is_switch_input_only_device(vendor_id, product_id) {
        ControllerFamily::SwitchInputOnly
    } else {
        ControllerFamily::None
    }
}

/// Decode one raw input report for a previously classified device.
pub fn decode_for_family(
    family: ControllerFamily,
    data: &[u8],
) -> Result<CanonicalState, DecodeError> {
    match family {
        ControllerFamily::Xbox360 => Ok(hid_xbox360_protocol::decode(data)?),
        ControllerFamily::XboxOne => Ok(hid_xboxone_protocol::decode(data)?),
        ControllerFamily::SwitchInputOnly => Ok(hid_switch_wired_protocol::decode(data)?),
        ControllerFamily::None => Err(DecodeError::UnsupportedFamily),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padbridge_types::buttons;

    #[test]
    fn test_detect_known_devices() {
        assert_eq!(detect(0x045E, 0x028E), ControllerFamily::Xbox360);
        assert_eq!(detect(0x045E, 0x0719), ControllerFamily::Xbox360);
        assert_eq!(detect(0x045E, 0x02D1), ControllerFamily::XboxOne);
        assert_eq!(detect(0x045E, 0x0B12), ControllerFamily::XboxOne);
        assert_eq!(detect(0x0E6F, 0x0180), ControllerFamily::SwitchInputOnly);
        assert_eq!(detect(0x0E6F, 0x0187), ControllerFamily::SwitchInputOnly);
    }

    #[test]
    fn test_detect_unknown_is_none() {
        assert_eq!(detect(0x1234, 0x5678), ControllerFamily::None);
        // Right vendor, wrong product.
        assert_eq!(detect(0x045E, 0xFFFF), ControllerFamily::None);
        // Right product, wrong vendor.
        assert_eq!(detect(0x0000, 0x028E), ControllerFamily::None);
    }

    #[test]
    fn test_dispatch_decodes_per_family() {
        // Neutral 20-byte XUSB report.
        let mut xusb = [0u8; 20];
        xusb[1] = 0x14;
        let state = decode_for_family(ControllerFamily::Xbox360, &xusb).expect("decode");
        assert_eq!(state.buttons, 0);

        // Switch report with A pressed.
        let switch = [0x04u8, 0x00, 8, 128, 128, 128, 128];
        let state = decode_for_family(ControllerFamily::SwitchInputOnly, &switch).expect("decode");
        assert_eq!(state.buttons, buttons::EAST);
    }

    #[test]
    fn test_dispatch_rejects_cross_family_report() {
        // A 7-byte Switch report is too short for XUSB.
        let switch = [0u8, 0, 8, 128, 128, 128, 128];
        assert!(decode_for_family(ControllerFamily::Xbox360, &switch).is_err());
    }

    #[test]
    fn test_dispatch_none_family() {
        assert_eq!(
            decode_for_family(ControllerFamily::None, &[0u8; 20]),
            Err(DecodeError::UnsupportedFamily)
        );
    }
}
