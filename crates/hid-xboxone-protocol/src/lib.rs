//! USB protocol implementation for Xbox One / Series controllers (GIP).
//!
//! ## Protocol notes
//!
//! Xbox One controllers speak the GIP (Gaming Input Protocol) over
//! interrupt endpoints. Unlike the Xbox 360 family:
//!
//! - Input reports are message type `0x20` with a flags/counter/length
//!   header; the guide button arrives in a *separate* `0x07` message,
//!   which this decoder recognizes and rejects as a non-input report.
//! - Triggers are **10-bit** (0–1023), converted to 8-bit by discarding
//!   the low two bits — lossy by design and not configurable.
//! - After claiming the interface a fixed 5-byte init command must be
//!   written once before the controller starts sending input reports.
//!
//! Layouts follow the USB Host Shield 2.0 library and the Linux `xpad`
//! driver (`xpad_process_packet` for `XTYPE_XBOXONE`).

#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod ids;
pub mod input;
pub mod output;

pub use ids::*;
pub use input::*;
pub use output::*;

use thiserror::Error;

/// Errors returned by Xbox One protocol operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum XboxOneError {
    #[error("Invalid report size: expected at least {expected}, got {actual}")]
    InvalidReportSize { expected: usize, actual: usize },

    #[error("Not an input report: message type {msg_type:#04x}")]
    NotInputReport { msg_type: u8 },
}

/// Convenience result alias for Xbox One protocol operations.
pub type XboxOneResult<T> = Result<T, XboxOneError>;

/// Message type of a GIP input report.
pub const MSG_TYPE_INPUT: u8 = 0x20;
/// Message type of the separate guide-button report.
pub const MSG_TYPE_GUIDE: u8 = 0x07;

/// Minimum input report size in bytes (header + buttons + triggers + sticks).
pub const REPORT_SIZE_INPUT_MIN: usize = 18;
/// Maximum report size read from the endpoint.
pub const REPORT_SIZE_MAX: usize = 64;

/// Maximum raw trigger value (10-bit).
pub const TRIGGER_MAX: u16 = 1023;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(MSG_TYPE_INPUT, 0x20);
        assert_eq!(MSG_TYPE_GUIDE, 0x07);
        assert_eq!(REPORT_SIZE_INPUT_MIN, 18);
        assert_eq!(TRIGGER_MAX, 1023);
    }
}
