//! Terrain collaborator
//!
//! The simulation never owns terrain geometry. It only needs two queries:
//! a nearest-hit ray cast (for the grapple) and a set of sampled surface
//! points with normals (for collision). [`SphereTerrain`] is a ready-made
//! implementation used by the demo binary and the tests.

use tether_math::Vec3;

/// Result of a successful ray query
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point
    pub point: Vec3,
    /// Distance from the ray origin to `point`
    pub distance: f32,
    /// Unit surface normal at the hit, facing the ray origin
    pub normal: Vec3,
}

/// A sampled surface point
///
/// `normal` points from the walkable side into the solid volume, so a
/// player moving into the surface has motion with a positive component
/// along it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    pub position: Vec3,
    pub normal: Vec3,
}

impl SurfaceSample {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Queryable, immutable terrain
pub trait Terrain {
    /// Nearest hit along `direction` strictly within `(0, max_distance)`
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Surface samples used for collision proximity queries
    fn samples(&self) -> &[SurfaceSample];
}

/// Which side of the sphere the player lives on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceSide {
    /// Solid planet, walked on from the outside
    Outside,
    /// Hollow shell, walked on from the inside
    Inside,
}

/// A sampled sphere with an analytic ray query
#[derive(Clone, Debug)]
pub struct SphereTerrain {
    center: Vec3,
    radius: f32,
    side: SurfaceSide,
    samples: Vec<SurfaceSample>,
}

impl SphereTerrain {
    /// Create a sphere terrain with `sample_count` points on a Fibonacci lattice
    pub fn new(center: Vec3, radius: f32, side: SurfaceSide, sample_count: usize) -> Self {
        let samples = fibonacci_directions(sample_count)
            .map(|dir| {
                let into_solid = match side {
                    SurfaceSide::Outside => -dir,
                    SurfaceSide::Inside => dir,
                };
                SurfaceSample::new(center + dir * radius, into_solid)
            })
            .collect();

        Self {
            center,
            radius,
            side,
            samples,
        }
    }

    /// A solid planet
    pub fn solid(center: Vec3, radius: f32, sample_count: usize) -> Self {
        Self::new(center, radius, SurfaceSide::Outside, sample_count)
    }

    /// A hollow shell
    pub fn hollow(center: Vec3, radius: f32, sample_count: usize) -> Self {
        Self::new(center, radius, SurfaceSide::Inside, sample_count)
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn side(&self) -> SurfaceSide {
        self.side
    }
}

impl Terrain for SphereTerrain {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.try_normalized(f32::EPSILON)?;

        // |o + t d - c|² = r², with |d| = 1
        let oc = origin - self.center;
        let b = oc.dot(dir);
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t = [-b - root, -b + root]
            .into_iter()
            .find(|&t| t > 0.0 && t < max_distance)?;

        let point = origin + dir * t;
        let mut normal = (point - self.center).normalized();
        if normal.dot(dir) > 0.0 {
            normal = -normal;
        }

        Some(RayHit {
            point,
            distance: t,
            normal,
        })
    }

    fn samples(&self) -> &[SurfaceSample] {
        &self.samples
    }
}

/// Evenly spread unit directions (golden-angle spiral)
fn fibonacci_directions(count: usize) -> impl Iterator<Item = Vec3> {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    (0..count).map(move |i| {
        let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
        let ring = (1.0 - y * y).max(0.0).sqrt();
        let theta = golden_angle * i as f32;
        Vec3::new(theta.cos() * ring, y, theta.sin() * ring)
    })
}
