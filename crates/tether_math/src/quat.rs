//! Unit quaternion for representing rotations in 3D space
//!
//! A quaternion q = w + xi + yj + zk. Unit quaternions encode rotations;
//! the vector part (x, y, z) is the rotation axis scaled by sin(θ/2) and
//! the scalar part w is cos(θ/2).

use bytemuck::{Pod, Zeroable};
use crate::Vec3;

/// Below this, `1 + a·b` is treated as zero: the two directions are opposite
const ANTIPARALLEL_EPSILON: f32 = 1e-6;

/// Unit quaternion for representing rotations
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    #[inline]
    pub const fn from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation by `angle` radians about `axis`, counter-clockwise when
    /// looking down the axis toward the origin.
    ///
    /// `axis` is normalized here; a zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let half = angle * 0.5;
        let s = half.sin();
        Self::from_xyzw(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// Minimal-arc rotation taking unit vector `from` onto unit vector `to`
    ///
    /// When `from` and `to` point in opposite directions there is no unique
    /// minimal rotation. In that case the result is a half turn about an axis
    /// perpendicular to `from`, chosen from `from`'s largest components so
    /// that the same input always produces the same axis.
    pub fn from_unit_vectors(from: Vec3, to: Vec3) -> Self {
        let r = from.dot(to) + 1.0;

        let q = if r < ANTIPARALLEL_EPSILON {
            if from.x.abs() > from.z.abs() {
                Self::from_xyzw(-from.y, from.x, 0.0, 0.0)
            } else {
                Self::from_xyzw(0.0, -from.z, from.y, 0.0)
            }
        } else {
            let axis = from.cross(to);
            Self::from_xyzw(axis.x, axis.y, axis.z, r)
        };

        q.normalize()
    }

    /// Vector part (x, y, z)
    #[inline]
    pub fn xyz(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Normalize to unit magnitude
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            let inv_mag = 1.0 / mag;
            Self::from_xyzw(
                self.x * inv_mag,
                self.y * inv_mag,
                self.z * inv_mag,
                self.w * inv_mag,
            )
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate; for unit quaternions this is the inverse rotation
    pub fn conjugate(&self) -> Self {
        Self::from_xyzw(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotate a vector: v' = q v q*
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        // Expanded sandwich product: t = 2 (q × v), v' = v + w t + q × t
        let q = self.xyz();
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Compose two rotations: result = self * other
    /// The composed rotation applies `other` first, then `self`
    pub fn compose(&self, other: &Self) -> Self {
        let a = self;
        let b = other;
        Self::from_xyzw(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }

    /// Angle of the rotation in radians, in `[0, π]`
    pub fn angle(&self) -> f32 {
        2.0 * self.w.abs().min(1.0).acos()
    }
}
