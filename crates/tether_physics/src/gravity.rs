//! Radial gravity around a planet center

use tether_math::Vec3;

/// Positions closer than this to the center have no defined vertical
pub const MIN_CENTER_DISTANCE: f32 = 1e-4;

/// The body the player is attracted to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Planet {
    /// World-space center of the sphere
    pub center: Vec3,
    /// Gravity magnitude. Positive pulls toward the center; negative pulls
    /// outward, for levels played on the inside of a hollow shell.
    pub gravity: f32,
}

impl Default for Planet {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            gravity: 20.0,
        }
    }
}

impl Planet {
    pub fn new(center: Vec3, gravity: f32) -> Self {
        Self { center, gravity }
    }

    /// Local "up" at `position`: opposite to the gravity pull
    ///
    /// Returns `None` at the center, where no direction is defined.
    pub fn local_up(&self, position: Vec3) -> Option<Vec3> {
        let outward = (position - self.center).try_normalized(MIN_CENTER_DISTANCE)?;
        Some(if self.gravity >= 0.0 { outward } else { -outward })
    }

    /// Gravity acceleration at `position` (zero at the center)
    pub fn gravity_at(&self, position: Vec3) -> Vec3 {
        self.local_up(position)
            .map(|up| up * -self.gravity.abs())
            .unwrap_or(Vec3::ZERO)
    }

    pub fn distance_squared_from_center(&self, position: Vec3) -> f32 {
        position.distance_squared(self.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_gravity_points_toward_center() {
        let planet = Planet::new(Vec3::new(5.0, -3.0, 2.0), 9.8);
        let positions = [
            Vec3::new(0.0, 0.0, -60.0),
            Vec3::new(100.0, 0.5, 0.0),
            Vec3::new(5.0, 40.0, 2.0),
            Vec3::new(-7.0, -8.0, 9.0),
            Vec3::new(5.0, -3.0, 2.001),
        ];
        for p in positions {
            let g = planet.gravity_at(p);
            let toward_center = (planet.center - p).normalized();
            assert!(vec_approx_eq(g.normalized(), toward_center), "at {:?}: {:?}", p, g);
            assert!((g.length() - 9.8).abs() < EPSILON);
        }
    }

    #[test]
    fn test_local_up_is_outward() {
        let planet = Planet::default();
        let up = planet.local_up(Vec3::new(0.0, 0.0, -60.0)).unwrap();
        assert!(vec_approx_eq(up, -Vec3::Z));
    }

    #[test]
    fn test_negative_gravity_pulls_outward() {
        let planet = Planet::new(Vec3::ZERO, -10.0);
        let p = Vec3::new(0.0, 30.0, 0.0);
        assert!(vec_approx_eq(planet.gravity_at(p), Vec3::new(0.0, 10.0, 0.0)));
        // Up faces the center on the inside of a shell
        assert!(vec_approx_eq(planet.local_up(p).unwrap(), -Vec3::Y));
    }

    #[test]
    fn test_center_is_degenerate_not_nan() {
        let planet = Planet::default();
        assert!(planet.local_up(Vec3::ZERO).is_none());
        assert_eq!(planet.gravity_at(Vec3::ZERO), Vec3::ZERO);
    }
}
