//! Canonical button bitmask.
//!
//! A `u32` superset covering every button mapped by any supported family.
//! Face buttons use compass naming (SOUTH = Xbox A / Switch B position) so
//! no family's labels leak into the canonical layer.

/// South face button (Xbox A, Switch B).
pub const SOUTH: u32 = 1 << 0;
/// East face button (Xbox B, Switch A).
pub const EAST: u32 = 1 << 1;
/// West face button (Xbox X, Switch Y).
pub const WEST: u32 = 1 << 2;
/// North face button (Xbox Y, Switch X).
pub const NORTH: u32 = 1 << 3;
/// Left shoulder (LB / L).
pub const L1: u32 = 1 << 4;
/// Right shoulder (RB / R).
pub const R1: u32 = 1 << 5;
/// Digital left trigger. Synthesized by the translator from the analog
/// value; decoders never set this bit directly.
pub const L2: u32 = 1 << 6;
/// Digital right trigger. Synthesized by the translator.
pub const R2: u32 = 1 << 7;
/// Left stick click.
pub const L3: u32 = 1 << 8;
/// Right stick click.
pub const R3: u32 = 1 << 9;
/// Start / Menu / Plus.
pub const START: u32 = 1 << 10;
/// Back / View / Minus.
pub const SELECT: u32 = 1 << 11;
/// Guide / Xbox / Home.
pub const GUIDE: u32 = 1 << 12;
/// Capture (Switch only; no equivalent elsewhere).
pub const CAPTURE: u32 = 1 << 13;
/// D-pad up.
pub const DPAD_UP: u32 = 1 << 14;
/// D-pad down.
pub const DPAD_DOWN: u32 = 1 << 15;
/// D-pad left.
pub const DPAD_LEFT: u32 = 1 << 16;
/// D-pad right.
pub const DPAD_RIGHT: u32 = 1 << 17;

/// All four D-pad direction bits.
pub const DPAD_MASK: u32 = DPAD_UP | DPAD_DOWN | DPAD_LEFT | DPAD_RIGHT;

/// Convert an 8-direction hat value to canonical D-pad bits.
///
/// Hat values 0–7 are compass directions clockwise from North; any value
/// >= 8 means centered / no direction.
pub fn dpad_from_hat(hat: u8) -> u32 {
    match hat {
        0 => DPAD_UP,
        1 => DPAD_UP | DPAD_RIGHT,
        2 => DPAD_RIGHT,
        3 => DPAD_DOWN | DPAD_RIGHT,
        4 => DPAD_DOWN,
        5 => DPAD_DOWN | DPAD_LEFT,
        6 => DPAD_LEFT,
        7 => DPAD_UP | DPAD_LEFT,
        _ => 0,
    }
}
