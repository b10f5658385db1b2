//! Canonical controller state model for PadBridge.
//!
//! Everything protocol-independent lives here: the [`ControllerFamily`]
//! classification, the canonical [`buttons`] bitmask, the decoded
//! [`CanonicalState`] sample, the fixed-capacity [`RawReport`] buffer, and
//! the externally consumed [`PadOutput`] shape produced by the translator.
//!
//! This crate has no I/O and no protocol knowledge; the per-family
//! `hid-*-protocol` crates decode into these types.

#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod buttons;
pub mod family;
pub mod output;
pub mod state;

pub use buttons::*;
pub use family::*;
pub use output::*;
pub use state::*;

/// Number of physical controller slots tracked by the engine.
pub const MAX_SLOTS: usize = 4;

/// Stick axis center value (0–255 range).
pub const STICK_CENTER: u8 = 128;

/// Capacity of a [`RawReport`] buffer; sized to the largest supported
/// family's input report (Xbox One GIP reports are up to 64 bytes).
pub const RAW_REPORT_CAPACITY: usize = 64;
