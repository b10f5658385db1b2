//! USB protocol implementation for Xbox 360 wired controllers (XUSB).
//!
//! ## Protocol notes
//!
//! The Xbox 360 controller is not a standard HID device; it speaks the XUSB
//! vendor protocol over interrupt endpoints. The input report is a fixed
//! 20-byte message:
//!
//! | Bytes | Field |
//! |-------|-------|
//! | 0     | Message type, always `0x00` for input |
//! | 1     | Message length, always `0x14` (20) |
//! | 2     | Buttons low (D-pad, Start, Back, L3, R3) |
//! | 3     | Buttons high (LB, RB, Guide, A, B, X, Y) |
//! | 4–5   | Left / right trigger (0–255) |
//! | 6–13  | Four stick axes, `i16` little-endian |
//! | 14–19 | Reserved |
//!
//! Output reports are the 8-byte rumble command and the 3-byte player-LED
//! command (see [`output`]).
//!
//! Layout documented by the community reverse-engineering write-up at
//! partsnotincluded.com ("Understanding the Xbox 360 Wired Controller's USB
//! Data") and matched by the Linux `xpad` driver.

#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod ids;
pub mod input;
pub mod output;

pub use ids::*;
pub use input::*;
pub use output::*;

use thiserror::Error;

/// Errors returned by Xbox 360 protocol operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Xbox360Error {
    #[error("Invalid report size: expected {expected}, got {actual}")]
    InvalidReportSize { expected: usize, actual: usize },

    #[error("Invalid report header: type {msg_type:#04x}, length {msg_length:#04x}")]
    InvalidHeader { msg_type: u8, msg_length: u8 },
}

/// Convenience result alias for Xbox 360 protocol operations.
pub type Xbox360Result<T> = Result<T, Xbox360Error>;

/// Input report size in bytes.
pub const REPORT_SIZE_INPUT: usize = 20;
/// Rumble output report size in bytes.
pub const REPORT_SIZE_RUMBLE: usize = 8;
/// Player-LED output report size in bytes.
pub const REPORT_SIZE_LED: usize = 3;

/// Input report message type byte.
pub const MSG_TYPE_INPUT: u8 = 0x00;
/// Input report message length byte (`0x14` = 20).
pub const MSG_LENGTH_INPUT: u8 = 0x14;
