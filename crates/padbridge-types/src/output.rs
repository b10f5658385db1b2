//! Externally consumed output sample.

use crate::STICK_CENTER;

/// Neutral motion block carried by every output sample.
///
/// None of the supported families report motion data, so these fields are
/// always the resting defaults: identity orientation, zero angular velocity,
/// and 1 g acceleration on +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionData {
    /// Orientation quaternion (x, y, z, w).
    pub orientation: [f32; 4],
    /// Angular velocity in rad/s.
    pub angular_velocity: [f32; 3],
    /// Acceleration in g.
    pub acceleration: [f32; 3],
}

impl Default for MotionData {
    fn default() -> Self {
        Self {
            orientation: [0.0, 0.0, 0.0, 1.0],
            angular_velocity: [0.0, 0.0, 0.0],
            acceleration: [0.0, 0.0, 1.0],
        }
    }
}

/// The translated controller sample handed to consumers.
///
/// Produced by the translator from a [`crate::CanonicalState`]; the engine
/// read path stamps `seq`, `timestamp_ns`, and `connected`. `seq` increases
/// monotonically per slot so a consumer can detect whether the sample
/// changed since its last read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadOutput {
    /// Canonical button bitmask, including the synthesized digital
    /// L2/R2 trigger bits.
    pub buttons: u32,
    pub left_x: u8,
    pub left_y: u8,
    pub right_x: u8,
    pub right_y: u8,
    pub trigger_left: u8,
    pub trigger_right: u8,
    /// True when a physical controller backs this sample.
    pub connected: bool,
    /// Per-slot monotonic sequence counter (logical timestamp).
    pub seq: u64,
    /// Nanoseconds since the engine epoch.
    pub timestamp_ns: u64,
    pub motion: MotionData,
}

impl PadOutput {
    /// The sample consumers receive when no state has ever been produced:
    /// centered axes, zero buttons, default motion, disconnected.
    pub fn neutral() -> Self {
        Self {
            buttons: 0,
            left_x: STICK_CENTER,
            left_y: STICK_CENTER,
            right_x: STICK_CENTER,
            right_y: STICK_CENTER,
            trigger_left: 0,
            trigger_right: 0,
            connected: false,
            seq: 0,
            timestamp_ns: 0,
            motion: MotionData::default(),
        }
    }
}

impl Default for PadOutput {
    fn default() -> Self {
        Self::neutral()
    }
}
