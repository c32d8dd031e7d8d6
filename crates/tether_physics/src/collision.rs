//! Point-cloud terrain collision
//!
//! The terrain is approximated by its surface samples. After a move, the
//! samples close to the new position whose normal faces along the motion
//! (the player is moving into the surface there) are gathered, the normals
//! of the nearest few are averaged, and the component of the motion along
//! that averaged normal is removed.
//!
//! This is a proxy for exact mesh collision: at high speed or with sparse
//! samples the player can pass between samples in a single tick.

use tether_math::Vec3;

use crate::terrain::Terrain;

/// Tunables for the collision resolver
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionConfig {
    /// Samples farther than this from the new position are ignored
    pub distance_threshold: f32,
    /// How many of the nearest qualifying samples contribute to the normal
    pub max_neighbors: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 4.0,
            max_neighbors: 3,
        }
    }
}

/// Contact information from a resolved collision
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Averaged unit normal, pointing into the surface
    pub normal: Vec3,
    /// Distance the position was pushed back along `-normal`
    pub penetration: f32,
    /// Number of samples that contributed to `normal`
    pub samples: usize,
}

/// Output of [`CollisionResolver::resolve`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionResult {
    pub position: Vec3,
    pub velocity: Vec3,
    /// `None` when the motion was free
    pub contact: Option<Contact>,
}

/// Resolves a player move against a terrain's surface samples
#[derive(Clone, Debug, Default)]
pub struct CollisionResolver {
    pub config: CollisionConfig,
}

impl CollisionResolver {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    /// Averaged normal of the nearest samples the motion is heading into
    pub fn collision_normal<T: Terrain + ?Sized>(
        &self,
        terrain: &T,
        new_position: Vec3,
        delta: Vec3,
    ) -> Option<(Vec3, usize)> {
        let threshold_sq = self.config.distance_threshold * self.config.distance_threshold;

        let mut nearby: Vec<(f32, Vec3)> = terrain
            .samples()
            .iter()
            .filter(|s| s.normal.dot(delta) >= 0.0)
            .map(|s| (s.position.distance_squared(new_position), s.normal))
            .filter(|(dist_sq, _)| *dist_sq < threshold_sq)
            .collect();

        if nearby.is_empty() || self.config.max_neighbors == 0 {
            return None;
        }

        nearby.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
        nearby.truncate(self.config.max_neighbors);

        let count = nearby.len();
        let normal = nearby
            .into_iter()
            .map(|(_, n)| n)
            .sum::<Vec3>()
            .try_normalized(1e-6)?;

        Some((normal, count))
    }

    /// Resolve a move from `old_position` to `new_position`
    ///
    /// On contact, the position is pushed back along the collision normal by
    /// exactly the penetration `normal · delta`, and the velocity is rebuilt
    /// from the corrected displacement so the next tick does not carry the
    /// stale velocity back into the surface. Without contact the move and
    /// `velocity` are returned unchanged.
    pub fn resolve<T: Terrain + ?Sized>(
        &self,
        terrain: &T,
        old_position: Vec3,
        new_position: Vec3,
        velocity: Vec3,
        dt: f32,
    ) -> CollisionResult {
        let delta = new_position - old_position;

        let free = CollisionResult {
            position: new_position,
            velocity,
            contact: None,
        };

        let Some((normal, samples)) = self.collision_normal(terrain, new_position, delta) else {
            return free;
        };

        let penetration = normal.dot(delta);
        let position = new_position + normal * -penetration;
        let velocity = if dt > 0.0 {
            (position - old_position) / dt
        } else {
            velocity
        };

        log::trace!(
            "collision: {} samples, normal {:?}, penetration {:.4}",
            samples,
            normal,
            penetration
        );

        CollisionResult {
            position,
            velocity,
            contact: Some(Contact {
                normal,
                penetration,
                samples,
            }),
        }
    }
}
