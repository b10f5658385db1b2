//! Controller family classification.

use serde::{Deserialize, Serialize};

/// The wire-protocol family of a physical controller.
///
/// Selected once by the device registry when a slot transitions to
/// Connected and carried alongside the slot; per-report decoding dispatches
/// on this tag instead of re-examining the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerFamily {
    /// Xbox 360 wired controller (XUSB protocol, 20-byte reports).
    Xbox360,
    /// Xbox One / Series controller (GIP protocol, 10-bit triggers).
    XboxOne,
    /// Third-party Switch wired pad (input-only, 7-byte reports, no rumble).
    SwitchInputOnly,
    /// No supported family matched. Not an error; the device is skipped.
    #[default]
    None,
}

impl ControllerFamily {
    /// Size in bytes of this family's input report as read from the
    /// interrupt endpoint.
    pub fn report_size(self) -> usize {
        match self {
            Self::Xbox360 => 20,
            Self::XboxOne => 64,
            Self::SwitchInputOnly => 7,
            Self::None => 0,
        }
    }

    /// Interrupt IN endpoint address used for input polling.
    pub fn in_endpoint(self) -> u8 {
        match self {
            // All three families report input on EP1 IN.
            Self::Xbox360 | Self::XboxOne | Self::SwitchInputOnly => 0x81,
            Self::None => 0,
        }
    }

    /// Interrupt OUT endpoint address, if the family accepts output reports.
    pub fn out_endpoint(self) -> Option<u8> {
        match self {
            Self::Xbox360 | Self::XboxOne => Some(0x01),
            Self::SwitchInputOnly | Self::None => None,
        }
    }

    /// Whether the family supports the two-motor rumble command.
    pub fn supports_rumble(self) -> bool {
        matches!(self, Self::Xbox360 | Self::XboxOne)
    }

    /// Whether an initialization command must be written after claiming
    /// the interface, before input reports begin.
    pub fn needs_init_command(self) -> bool {
        matches!(self, Self::XboxOne)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Xbox360 => "Xbox 360",
            Self::XboxOne => "Xbox One",
            Self::SwitchInputOnly => "Switch (input-only)",
            Self::None => "unsupported",
        }
    }
}
