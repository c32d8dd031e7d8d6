//! Player locomotion under local gravity
//!
//! Each tick sums the contributions acting on the player (radial gravity,
//! camera-relative drift input, the grapple's pull and quadratic air drag)
//! into a local accumulator, then integrates velocity and position with
//! semi-implicit Euler. Drag is applied implicitly so that a single step can
//! shrink the speed toward zero but never reverse it. Nothing is carried
//! between ticks except position, velocity and the last valid local up.

use tether_math::{Quat, Vec3};

use crate::gravity::Planet;

/// Default scale from drift input to acceleration
pub const DEFAULT_MOVEMENT_FACTOR: f32 = 15.0;

/// Default quadratic drag coefficient
pub const DEFAULT_AIR_RESISTANCE: f32 = 0.05;

/// Tunables for locomotion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionConfig {
    /// Acceleration per unit of drift input
    pub movement_factor: f32,
    /// Drag coefficient k in `-k * v * |v|`
    pub air_resistance: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            movement_factor: DEFAULT_MOVEMENT_FACTOR,
            air_resistance: DEFAULT_AIR_RESISTANCE,
        }
    }
}

/// A proposed move for one tick, before collision resolution
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub from: Vec3,
    pub to: Vec3,
}

impl Motion {
    pub fn delta(&self) -> Vec3 {
        self.to - self.from
    }
}

/// Player locomotion state
#[derive(Clone, Debug)]
pub struct PlayerState {
    /// World-space position
    pub position: Vec3,
    /// World-space velocity
    pub velocity: Vec3,
    /// Total acceleration applied during the last tick
    pub acceleration: Vec3,
    /// Camera-local drift direction (-1/0/+1 per axis, normalized)
    drift_intent: Vec3,
    /// Last valid local up, kept for ticks where the position is degenerate
    up: Vec3,
    pub config: LocomotionConfig,
}

impl PlayerState {
    /// Create a new player at rest
    pub fn new(position: Vec3, planet: &Planet) -> Self {
        Self::with_config(position, planet, LocomotionConfig::default())
    }

    /// Create a new player with custom locomotion tunables
    pub fn with_config(position: Vec3, planet: &Planet, config: LocomotionConfig) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            drift_intent: Vec3::ZERO,
            up: planet.local_up(position).unwrap_or(Vec3::Y),
            config,
        }
    }

    /// Set the held-key drift direction in camera-local axes
    ///
    /// Components are clamped to [-1, 1] and the result normalized so that
    /// diagonal input is not faster than straight input.
    pub fn set_drift_intent(&mut self, intent: Vec3) {
        let clamped = Vec3::new(
            intent.x.clamp(-1.0, 1.0),
            intent.y.clamp(-1.0, 1.0),
            intent.z.clamp(-1.0, 1.0),
        );
        self.drift_intent = clamped.normalized();
    }

    pub fn drift_intent(&self) -> Vec3 {
        self.drift_intent
    }

    /// Local up as of the last tick
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Drift input converted into a world-space acceleration
    ///
    /// The camera-local vector is rotated by the camera orientation, then by
    /// the minimal arc taking the camera's up axis onto `local_up`, so
    /// "forward" stays tangent to the sphere even while the camera lags
    /// behind the local vertical.
    pub fn input_acceleration(&self, camera_orientation: Quat, local_up: Vec3) -> Vec3 {
        if self.drift_intent == Vec3::ZERO {
            return Vec3::ZERO;
        }

        let local = self.drift_intent * self.config.movement_factor;
        let world = camera_orientation.rotate(local);
        let camera_up = camera_orientation.rotate(Vec3::Y);
        Quat::from_unit_vectors(camera_up, local_up).rotate(world)
    }

    /// Velocity after one tick of the given non-drag acceleration plus drag
    ///
    /// `(v + a * dt) / (1 + k * |v| * dt)`: matches explicit drag for small
    /// steps and stays bounded by `|v + a * dt|` for any step size.
    fn integrate_velocity(&self, acceleration: Vec3, dt: f32) -> Vec3 {
        let damping = 1.0 + self.config.air_resistance * self.velocity.length() * dt;
        (self.velocity + acceleration * dt) / damping
    }

    /// Advance one tick
    ///
    /// `external` carries accelerations computed by other components this
    /// tick (the grapple). Returns the proposed move for collision resolution.
    pub fn step(&mut self, dt: f32, planet: &Planet, camera_orientation: Quat, external: Vec3) -> Motion {
        match planet.local_up(self.position) {
            Some(up) => self.up = up,
            None => log::warn!(
                "player at planet center {:?}, keeping previous up {:?}",
                self.position,
                self.up
            ),
        }

        let acceleration = planet.gravity_at(self.position)
            + self.input_acceleration(camera_orientation, self.up)
            + external;

        let velocity = self.integrate_velocity(acceleration, dt);
        self.acceleration = if dt > 0.0 {
            (velocity - self.velocity) / dt
        } else {
            acceleration
        };
        self.velocity = velocity;

        let from = self.position;
        self.position += self.velocity * dt;

        Motion {
            from,
            to: self.position,
        }
    }

    /// Accept the collision-corrected position and velocity
    pub fn apply_resolution(&mut self, position: Vec3, velocity: Vec3) {
        self.position = position;
        self.velocity = velocity;
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
