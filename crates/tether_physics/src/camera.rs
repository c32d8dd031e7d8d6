//! Camera rig whose up vector follows the local vertical
//!
//! Every tick the rig is moved to the player's position and, when the
//! reorientation policy allows it, rotated by the minimal arc that takes the
//! previous local up onto the current one. Applying that delta rotation to
//! the existing orientation keeps the view continuous while walking around
//! the sphere.

use serde::{Deserialize, Serialize};
use tether_math::{Quat, Vec3};

use crate::gravity::Planet;

/// Default maximum pitch above/below the local horizon, in degrees
pub const DEFAULT_PITCH_LIMIT_DEGREES: f32 = 89.0;

/// When the camera is allowed to re-align with the local vertical
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReorientPolicy {
    /// Re-align every tick
    Always,
    /// Re-align only while the squared distance from the planet center
    /// exceeds the threshold, avoiding jitter right at the center
    BeyondDistance { min_distance_squared: f32 },
}

impl Default for ReorientPolicy {
    fn default() -> Self {
        Self::BeyondDistance {
            min_distance_squared: 15.0,
        }
    }
}

/// First-person camera pose
#[derive(Clone, Debug)]
pub struct CameraRig {
    /// World-space position (the player's position)
    pub position: Vec3,
    /// Camera-local to world rotation; camera-local forward is -Z, up is +Y
    pub orientation: Quat,
    /// Reference up used for the next reorientation
    up: Vec3,
    pub policy: ReorientPolicy,
    /// Maximum pitch from the local horizon, in radians
    pub pitch_limit: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl CameraRig {
    /// Create a camera at `position` with identity orientation
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            up: Vec3::Y,
            policy: ReorientPolicy::default(),
            pitch_limit: DEFAULT_PITCH_LIMIT_DEGREES.to_radians(),
        }
    }

    /// Builder: set the reorientation policy
    pub fn with_policy(mut self, policy: ReorientPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder: set the pitch limit in degrees
    pub fn with_pitch_limit_degrees(mut self, degrees: f32) -> Self {
        self.pitch_limit = degrees.to_radians();
        self
    }

    /// The up vector the rig last aligned to
    pub fn reference_up(&self) -> Vec3 {
        self.up
    }

    /// Forward direction in world space
    pub fn forward(&self) -> Vec3 {
        self.orientation.rotate(Vec3::NEG_Z)
    }

    /// Right direction in world space
    pub fn right(&self) -> Vec3 {
        self.orientation.rotate(Vec3::X)
    }

    /// The camera's own up axis in world space
    ///
    /// Differs from [`reference_up`](Self::reference_up) when pitched.
    pub fn up_axis(&self) -> Vec3 {
        self.orientation.rotate(Vec3::Y)
    }

    /// Transform a camera-local offset into a world-space point
    pub fn local_to_world(&self, offset: Vec3) -> Vec3 {
        self.position + self.orientation.rotate(offset)
    }

    /// Turn to face `target`, keeping the camera's up as close as possible
    /// to the reference up
    pub fn look_at(&mut self, target: Vec3) {
        let dir = match (target - self.position).try_normalized(f32::EPSILON) {
            Some(dir) => dir,
            None => return,
        };

        let facing = Quat::from_unit_vectors(Vec3::NEG_Z, dir);

        // Roll about the view direction so the camera up matches the
        // reference up projected onto the view plane
        let camera_up = facing.rotate(Vec3::Y);
        let roll = match (self.up - dir * self.up.dot(dir)).try_normalized(1e-4) {
            Some(desired) if camera_up.dot(desired) < -0.9999 => {
                Quat::from_axis_angle(dir, std::f32::consts::PI)
            }
            Some(desired) => Quat::from_unit_vectors(camera_up, desired),
            None => Quat::IDENTITY,
        };

        self.orientation = roll.compose(&facing).normalize();
    }

    /// Whether the policy allows reorientation at `position`
    pub fn should_reorient(&self, position: Vec3, planet: &Planet) -> bool {
        match self.policy {
            ReorientPolicy::Always => true,
            ReorientPolicy::BeyondDistance {
                min_distance_squared,
            } => planet.distance_squared_from_center(position) > min_distance_squared,
        }
    }

    /// Move to `position` and re-align with its local vertical
    ///
    /// Returns true if the orientation was changed.
    pub fn update(&mut self, position: Vec3, planet: &Planet) -> bool {
        let mut reoriented = false;

        if self.should_reorient(position, planet) {
            if let Some(new_up) = planet.local_up(position) {
                let delta = Quat::from_unit_vectors(self.up, new_up);
                self.orientation = delta.compose(&self.orientation).normalize();
                self.up = new_up;
                reoriented = true;
            }
        }

        self.position = position;
        reoriented
    }

    /// Mouse look: yaw about the reference up, pitch about the camera right
    ///
    /// Positive `delta_yaw` turns right, positive `delta_pitch` looks down.
    /// Pitch is clamped to `pitch_limit` from the local horizon.
    pub fn look(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let up = self.up;

        if delta_yaw != 0.0 {
            let yaw = Quat::from_axis_angle(up, -delta_yaw);
            self.orientation = yaw.compose(&self.orientation).normalize();
        }

        if delta_pitch != 0.0 {
            let forward = self.forward();
            let current = forward.dot(up).clamp(-1.0, 1.0).asin();
            let target = (current - delta_pitch).clamp(-self.pitch_limit, self.pitch_limit);
            let right = forward
                .cross(up)
                .try_normalized(1e-4)
                .unwrap_or_else(|| self.right());
            let pitch = Quat::from_axis_angle(right, target - current);
            self.orientation = pitch.compose(&self.orientation).normalize();
        }
    }

    /// Current pitch above the local horizon, in radians
    pub fn pitch(&self) -> f32 {
        self.forward().dot(self.up).clamp(-1.0, 1.0).asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_default_axes() {
        let cam = CameraRig::new(Vec3::ZERO);
        assert!(vec_approx_eq(cam.forward(), Vec3::NEG_Z));
        assert!(vec_approx_eq(cam.right(), Vec3::X));
        assert!(vec_approx_eq(cam.up_axis(), Vec3::Y));
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut cam = CameraRig::new(Vec3::new(0.0, 0.0, -60.0));
        cam.look_at(Vec3::ZERO);
        assert!(vec_approx_eq(cam.forward(), Vec3::Z), "forward {:?}", cam.forward());
        assert!(vec_approx_eq(cam.up_axis(), Vec3::Y), "up {:?}", cam.up_axis());
    }

    #[test]
    fn test_local_to_world() {
        let mut cam = CameraRig::new(Vec3::new(0.0, 0.0, -60.0));
        cam.look_at(Vec3::ZERO);
        // Facing +Z, camera right is -X
        let p = cam.local_to_world(Vec3::new(1.0, 0.0, 0.0));
        assert!(vec_approx_eq(p, Vec3::new(-1.0, 0.0, -60.0)), "{:?}", p);
    }

    #[test]
    fn test_update_aligns_up_with_local_vertical() {
        let planet = Planet::default();
        let mut cam = CameraRig::new(Vec3::ZERO).with_policy(ReorientPolicy::Always);
        let position = Vec3::new(30.0, 0.0, 0.0);

        assert!(cam.update(position, &planet));
        assert_eq!(cam.position, position);
        assert!(vec_approx_eq(cam.reference_up(), Vec3::X));
        assert!(vec_approx_eq(cam.up_axis(), Vec3::X));
    }

    #[test]
    fn test_update_is_continuous() {
        // Walking a small step along the surface only rotates the view a little
        let planet = Planet::default();
        let mut cam = CameraRig::new(Vec3::ZERO).with_policy(ReorientPolicy::Always);
        cam.update(Vec3::new(0.0, 50.0, 0.0), &planet);
        let before = cam.forward();
        cam.update(Vec3::new(0.5, 50.0, 0.0), &planet);
        let after = cam.forward();
        assert!(before.dot(after) > 0.999);
    }

    #[test]
    fn test_update_handles_pole_flip() {
        // Up flipping to its opposite still yields a valid rotation
        let planet = Planet::default();
        let mut cam = CameraRig::new(Vec3::ZERO).with_policy(ReorientPolicy::Always);
        cam.update(Vec3::new(0.0, -20.0, 0.0), &planet);
        assert!(cam.orientation.rotate(Vec3::X).is_finite());
        assert!(vec_approx_eq(cam.up_axis(), -Vec3::Y));
    }

    #[test]
    fn test_threshold_policy_skips_near_center() {
        let planet = Planet::default();
        let mut cam = CameraRig::new(Vec3::ZERO).with_policy(ReorientPolicy::BeyondDistance {
            min_distance_squared: 15.0,
        });
        let near = Vec3::new(3.0, 0.0, 0.0); // 9 < 15
        assert!(!cam.update(near, &planet));
        assert_eq!(cam.position, near);
        assert!(vec_approx_eq(cam.reference_up(), Vec3::Y));

        let far = Vec3::new(4.0, 0.0, 0.0); // 16 > 15
        assert!(cam.update(far, &planet));
        assert!(vec_approx_eq(cam.reference_up(), Vec3::X));
    }

    #[test]
    fn test_update_at_center_keeps_orientation() {
        let planet = Planet::default();
        let mut cam = CameraRig::new(Vec3::new(1.0, 0.0, 0.0)).with_policy(ReorientPolicy::Always);
        let before = cam.orientation;
        assert!(!cam.update(Vec3::ZERO, &planet));
        assert_eq!(cam.orientation, before);
    }

    #[test]
    fn test_look_yaw_turns_right() {
        let mut cam = CameraRig::new(Vec3::ZERO);
        cam.look(std::f32::consts::FRAC_PI_2, 0.0);
        assert!(vec_approx_eq(cam.forward(), Vec3::X), "{:?}", cam.forward());
    }

    #[test]
    fn test_look_pitch_down() {
        let mut cam = CameraRig::new(Vec3::ZERO);
        cam.look(0.0, 0.5);
        assert!((cam.pitch() + 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_look_pitch_clamped() {
        let mut cam = CameraRig::new(Vec3::ZERO).with_pitch_limit_degrees(80.0);
        for _ in 0..20 {
            cam.look(0.0, -0.3);
        }
        assert!(cam.pitch() <= 80.0f32.to_radians() + EPSILON);
        assert!(cam.pitch() > 79.0f32.to_radians());
        // Right axis survives so pitching back works
        cam.look(0.0, 0.5);
        assert!(cam.pitch() < 80.0f32.to_radians() - 0.4);
    }
}
