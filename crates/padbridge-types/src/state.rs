//! Decoded canonical sample and raw report capture.

use crate::{RAW_REPORT_CAPACITY, STICK_CENTER, buttons};

/// A family-independent decoded controller sample.
///
/// Produced by the per-family protocol decoders; consumed by the translator.
/// Axes are unsigned 8-bit with center 128. Triggers are fully normalized to
/// 0–255 at decode time (the 10-bit GIP range is divided by 4 by its
/// decoder, lossy by design).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalState {
    /// Canonical button bitmask (see [`buttons`]). Never contains the
    /// digital L2/R2 bits; those are synthesized by the translator.
    pub buttons: u32,
    pub left_x: u8,
    pub left_y: u8,
    pub right_x: u8,
    pub right_y: u8,
    pub trigger_left: u8,
    pub trigger_right: u8,
}

impl CanonicalState {
    /// Neutral sample: centered sticks, released triggers, no buttons.
    pub fn neutral() -> Self {
        Self {
            buttons: 0,
            left_x: STICK_CENTER,
            left_y: STICK_CENTER,
            right_x: STICK_CENTER,
            right_y: STICK_CENTER,
            trigger_left: 0,
            trigger_right: 0,
        }
    }

    pub fn button_pressed(&self, mask: u32) -> bool {
        self.buttons & mask != 0
    }

    /// The four canonical D-pad bits of this sample.
    pub fn dpad(&self) -> u32 {
        self.buttons & buttons::DPAD_MASK
    }
}

impl Default for CanonicalState {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Convert a signed 16-bit stick axis to the canonical unsigned 8-bit range.
///
/// Maps -32768 -> 0, 0 -> 128, 32767 -> 255. Shared by the two Xbox
/// families, which report sticks as little-endian `i16`.
pub fn stick_to_u8(v: i16) -> u8 {
    (((i32::from(v) + 32768) >> 8) & 0xFF) as u8
}

/// A captured raw input report: fixed-capacity buffer plus actual length.
///
/// Never mutated after capture; each poll cycle produces a fresh value. The
/// capacity covers the largest supported family so one buffer type serves
/// all slots without reinterpreting overlapping memory.
#[derive(Debug, Clone, Copy)]
pub struct RawReport {
    bytes: [u8; RAW_REPORT_CAPACITY],
    len: u8,
}

impl RawReport {
    /// Capture `data` into a fresh report. Input longer than the buffer
    /// capacity is truncated; decoders validate length anyway.
    pub fn capture(data: &[u8]) -> Self {
        let mut bytes = [0u8; RAW_REPORT_CAPACITY];
        let len = data.len().min(RAW_REPORT_CAPACITY);
        bytes[..len].copy_from_slice(&data[..len]);
        Self {
            bytes,
            len: len as u8,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
