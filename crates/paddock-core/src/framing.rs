//! Camera placement derived from normalized asset bounds

use bevy_math::Vec3;

/// Default distance constant for the initial three-quarter framing
pub const FRAMING_DISTANCE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    /// Head-on preset restored by `reset_view`
    pub const RESET: CameraPose = CameraPose {
        position: Vec3::new(0.0, 2.0, 8.0),
        target: Vec3::new(0.0, 1.0, 0.0),
    };

    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::RESET
    }
}

/// Off-axis framing of a freshly normalized asset.
///
/// Looks at `(0, size.y, 0)` from `(distance * 1.5, size.y + 1, distance * 0.5)`.
pub fn frame_asset(size: Vec3, distance: f32) -> CameraPose {
    let target_y = size.y;
    CameraPose {
        position: Vec3::new(distance * 1.5, target_y + 1.0, distance * 0.5),
        target: Vec3::new(0.0, target_y, 0.0),
    }
}

pub fn reset_view() -> CameraPose {
    CameraPose::RESET
}
