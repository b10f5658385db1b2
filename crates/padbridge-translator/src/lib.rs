//! Canonical-state to pad-output translation.
//!
//! Pure functions over [`CanonicalState`]: radial-per-axis deadzones, Y-axis
//! inversion, digital trigger synthesis, and face-button remapping. The
//! translator never performs I/O and never stamps sequence numbers or
//! timestamps; the engine read path owns those fields.

#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

use padbridge_types::{CanonicalState, PadOutput, STICK_CENTER, buttons};
use serde::{Deserialize, Serialize};

/// Largest usable deadzone. At 127 the rescale denominator would reach
/// zero, so configured values above this are clamped.
pub const MAX_DEADZONE: u8 = 126;

/// Translation settings, applied identically to every slot.
///
/// All fields have defaults, so a config file may specify any subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Per-axis stick deadzone, in output units around center 128.
    pub stick_deadzone: u8,
    /// Analog trigger value at or above which the digital L2/R2 button
    /// bits are set. The comparison is inclusive, so zero keeps both
    /// bits set.
    pub trigger_threshold: u8,
    /// Invert the left stick Y axis (up becomes larger values).
    pub invert_left_y: bool,
    /// Invert the right stick Y axis.
    pub invert_right_y: bool,
    /// Exchange the south and east face buttons.
    pub swap_ab: bool,
    /// Exchange the west and north face buttons.
    pub swap_xy: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            stick_deadzone: 15,
            trigger_threshold: 30,
            invert_left_y: true,
            invert_right_y: true,
            swap_ab: false,
            swap_xy: false,
        }
    }
}

/// Apply the deadzone to one axis value.
///
/// Values within `deadzone` of center snap to exactly 128; values outside
/// are rescaled so the output still sweeps the full range, with no jump at
/// the deadzone edge:
///
/// ```text
/// scaled = (|v - 128| - deadzone) * 127 / (127 - deadzone)
/// ```
///
/// A deadzone of 0 is a passthrough.
pub fn apply_deadzone(value: u8, deadzone: u8) -> u8 {
    if deadzone == 0 {
        return value;
    }
    let d = i32::from(deadzone.min(MAX_DEADZONE));
    let centered = i32::from(value) - i32::from(STICK_CENTER);
    let magnitude = centered.abs();
    if magnitude <= d {
        return STICK_CENTER;
    }
    let scaled = (magnitude - d) * 127 / (127 - d);
    let out = if centered < 0 {
        i32::from(STICK_CENTER) - scaled
    } else {
        i32::from(STICK_CENTER) + scaled
    };
    out.clamp(0, 255) as u8
}

fn swap_bits(bits: u32, a: u32, b: u32) -> u32 {
    let mut out = bits & !(a | b);
    if bits & a != 0 {
        out |= b;
    }
    if bits & b != 0 {
        out |= a;
    }
    out
}

/// Translate one decoded sample into the externally consumed shape.
///
/// `connected`, `seq`, and `timestamp_ns` are left at their neutral values
/// for the caller to stamp.
pub fn translate(state: &CanonicalState, config: &TranslatorConfig) -> PadOutput {
    let left_y = if config.invert_left_y {
        255 - state.left_y
    } else {
        state.left_y
    };
    let right_y = if config.invert_right_y {
        255 - state.right_y
    } else {
        state.right_y
    };

    // Decoders never emit L2/R2; mask them anyway so the threshold below
    // is the single source of those bits.
    let mut out_buttons = state.buttons & !(buttons::L2 | buttons::R2);
    if config.swap_ab {
        out_buttons = swap_bits(out_buttons, buttons::SOUTH, buttons::EAST);
    }
    if config.swap_xy {
        out_buttons = swap_bits(out_buttons, buttons::WEST, buttons::NORTH);
    }
    if state.trigger_left >= config.trigger_threshold {
        out_buttons |= buttons::L2;
    }
    if state.trigger_right >= config.trigger_threshold {
        out_buttons |= buttons::R2;
    }

    PadOutput {
        buttons: out_buttons,
        left_x: apply_deadzone(state.left_x, config.stick_deadzone),
        left_y: apply_deadzone(left_y, config.stick_deadzone),
        right_x: apply_deadzone(state.right_x, config.stick_deadzone),
        right_y: apply_deadzone(right_y, config.stick_deadzone),
        trigger_left: state.trigger_left,
        trigger_right: state.trigger_right,
        ..PadOutput::neutral()
    }
}
