//! Protocol implementation for input-only wired Switch pads.
//!
//! Covers the PDP (and compatible third-party) wired controllers that
//! enumerate as plain HID gamepads with a tiny 7-byte report:
//!
//! | Bytes | Field |
//! |-------|-------|
//! | 0     | Buttons 0 (face buttons, shoulders, digital ZL/ZR) |
//! | 1     | Buttons 1 (Minus, Plus, stick clicks, Home, Capture) |
//! | 2     | Hat (0–7 compass clockwise from North, >= 8 centered) |
//! | 3–6   | Stick axes, already unsigned 8-bit with center 128 |
//!
//! There is no header to validate beyond the length, no output endpoint,
//! and no rumble. ZL/ZR are digital; the decoder renders them as trigger
//! values 0 or 255 so the translator's threshold logic applies uniformly.
//!
//! Layout matches SDL's `hidapi_switch` input-only controller packet
//! (`SwitchInputOnlyControllerStatePacket_t`).

#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod ids;
pub mod input;

pub use ids::*;
pub use input::*;

use thiserror::Error;

/// Errors returned by Switch input-only protocol operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SwitchError {
    #[error("Invalid report size: expected {expected}, got {actual}")]
    InvalidReportSize { expected: usize, actual: usize },
}

/// Convenience result alias for Switch protocol operations.
pub type SwitchResult<T> = Result<T, SwitchError>;

/// Input report size in bytes.
pub const REPORT_SIZE_INPUT: usize = 7;

/// First hat value meaning "centered / no direction".
pub const HAT_CENTERED: u8 = 8;
