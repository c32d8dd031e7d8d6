//! Per-tick input snapshot

use bitflags::bitflags;
use tether_math::Vec3;

bitflags! {
    /// Held movement and modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Intent: u8 {
        /// W - along camera -Z
        const FORWARD = 1 << 0;
        /// S - along camera +Z
        const BACKWARD = 1 << 1;
        /// A - along camera -X
        const LEFT = 1 << 2;
        /// D - along camera +X
        const RIGHT = 1 << 3;
        /// Space - along camera +Y
        const UP = 1 << 4;
        /// Ctrl - along camera -Y
        const DOWN = 1 << 5;
        /// Right mouse button or Shift - reel in while attached
        const PULL = 1 << 6;
        /// All drift directions
        const MOVEMENT = Self::FORWARD.bits()
            | Self::BACKWARD.bits()
            | Self::LEFT.bits()
            | Self::RIGHT.bits()
            | Self::UP.bits()
            | Self::DOWN.bits();
    }
}

/// Input for a single tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// Keys and buttons held at sampling time
    pub held: Intent,
    /// Fire was pressed since the previous snapshot
    pub fire_pressed: bool,
    /// Fire was released since the previous snapshot
    pub fire_released: bool,
    /// Mouse look since the previous snapshot, in radians (yaw right, pitch down)
    pub look_delta: (f32, f32),
}

impl InputSnapshot {
    /// Camera-local drift direction, -1/0/+1 per axis (not normalized)
    pub fn drift_intent(&self) -> Vec3 {
        let axis = |pos: Intent, neg: Intent| {
            (self.held.contains(pos) as i32 - self.held.contains(neg) as i32) as f32
        };
        Vec3::new(
            axis(Intent::RIGHT, Intent::LEFT),
            axis(Intent::UP, Intent::DOWN),
            axis(Intent::BACKWARD, Intent::FORWARD),
        )
    }

    /// Whether reel-in is requested
    pub fn pull(&self) -> bool {
        self.held.contains(Intent::PULL)
    }

    /// Whether any drift key is held
    pub fn is_moving(&self) -> bool {
        self.held.intersects(Intent::MOVEMENT)
    }
}
