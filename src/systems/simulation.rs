//! Game simulation system
//!
//! Owns every piece of per-session state and advances it once per frame in
//! a fixed order:
//! 1. Delta time from the frame clock
//! 2. Mouse look
//! 3. Grapple input and update (rope acceleration)
//! 4. Locomotion (gravity + input + rope + drag)
//! 5. Collision against the terrain samples
//! 6. Camera follows the resolved position

use tether_input::InputSnapshot;
use tether_math::Vec3;
use tether_physics::{
    CameraRig, CollisionResolver, Contact, Grapple, GrappleInput, GrapplePhase, Planet,
    PlayerState, Terrain,
};

use crate::config::AppConfig;

/// Result of a simulation update
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationResult {
    /// False when the call only established the time base
    pub stepped: bool,
    /// Integrated time step in seconds
    pub dt: f32,
    /// Rope acceleration applied to the player this tick
    pub grapple_acceleration: Vec3,
    /// Terrain contact, if the move was corrected
    pub contact: Option<Contact>,
    /// Whether the camera re-aligned with the local vertical
    pub reoriented: bool,
}

/// Player, camera and grapple on one planet
pub struct Simulation<T: Terrain> {
    planet: Planet,
    terrain: T,
    player: PlayerState,
    camera: CameraRig,
    resolver: CollisionResolver,
    grapple: Grapple,
    last_timestamp: Option<f64>,
    max_frame_seconds: f32,
    ticks: u64,
}

impl<T: Terrain> Simulation<T> {
    /// Create a simulation on `terrain` using the configured tunables
    pub fn new(terrain: T, config: &AppConfig) -> Self {
        let planet = config.planet.to_planet();
        let start = config.player.start();
        let player = PlayerState::with_config(start, &planet, config.player.to_locomotion_config());

        // Stand the camera upright on the local vertical before the first frame
        let mut camera = config.camera.to_camera_rig(start);
        camera.update(start, &planet);

        Self {
            planet,
            terrain,
            player,
            camera,
            resolver: CollisionResolver::new(config.collision.to_collision_config()),
            grapple: Grapple::new(config.grapple.to_grapple_config(), config.rope.to_rope_config()),
            last_timestamp: None,
            max_frame_seconds: config.session.max_frame_seconds,
            ticks: 0,
        }
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub fn grapple(&self) -> &Grapple {
        &self.grapple
    }

    /// Number of integrated ticks so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one simulation frame
    ///
    /// `timestamp_ms` is the frame clock in milliseconds and must not go
    /// backwards. The first call only records the time base. Frames that do
    /// not advance the clock still apply look and grapple input, so edges
    /// taken from the input controller are never lost.
    pub fn update(&mut self, timestamp_ms: f64, input: &InputSnapshot) -> SimulationResult {
        // 1. Calculate delta time
        let dt = match self.last_timestamp.replace(timestamp_ms) {
            None => {
                log::debug!("time base set at {:.1} ms", timestamp_ms);
                None
            }
            Some(last) => {
                let raw_dt = ((timestamp_ms - last) / 1000.0) as f32;
                if raw_dt <= 0.0 {
                    log::trace!("non-positive frame time {:.4}s, skipping", raw_dt);
                    None
                } else {
                    // Cap dt so a stall does not launch the player
                    Some(raw_dt.min(self.max_frame_seconds))
                }
            }
        };

        // 2. Mouse look
        let (yaw, pitch) = input.look_delta;
        self.camera.look(yaw, pitch);

        // 3. Grapple
        let grapple_input = GrappleInput {
            fire: input.fire_pressed,
            release: input.fire_released,
            pull: input.pull(),
        };
        self.grapple.handle_input(&grapple_input, &self.camera, &self.terrain);
        let Some(dt) = dt else {
            return SimulationResult::default();
        };
        let grapple_acceleration = self.grapple.update(&self.camera, self.player.position);

        // 4. Locomotion
        self.player.set_drift_intent(input.drift_intent());
        let motion = self
            .player
            .step(dt, &self.planet, self.camera.orientation, grapple_acceleration);

        // 5. Collision
        let resolved = self.resolver.resolve(
            &self.terrain,
            motion.from,
            motion.to,
            self.player.velocity,
            dt,
        );
        self.player.apply_resolution(resolved.position, resolved.velocity);

        // 6. Camera
        let reoriented = self.camera.update(self.player.position, &self.planet);

        self.ticks += 1;
        log::trace!(
            "tick {}: dt={:.4} pos={:?} vel={:?} grapple={:?}",
            self.ticks,
            dt,
            self.player.position,
            self.player.velocity,
            self.grapple.phase()
        );

        SimulationResult {
            stepped: true,
            dt,
            grapple_acceleration,
            contact: resolved.contact,
            reoriented,
        }
    }

    /// Current grapple phase
    pub fn grapple_phase(&self) -> GrapplePhase {
        self.grapple.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_input::Intent;
    use tether_physics::SphereTerrain;

    const EPSILON: f32 = 0.0001;

    fn simulation() -> Simulation<SphereTerrain> {
        let config = AppConfig::default();
        let terrain = config.terrain.build(Vec3::ZERO);
        Simulation::new(terrain, &config)
    }

    #[test]
    fn test_first_update_sets_time_base() {
        let mut sim = simulation();
        let start = sim.player().position;

        let result = sim.update(5_000.0, &InputSnapshot::default());

        assert!(!result.stepped);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.player().position, start);
        assert_eq!(sim.player().velocity, Vec3::ZERO);
    }

    #[test]
    fn test_dt_from_timestamps() {
        let mut sim = simulation();
        sim.update(1_000.0, &InputSnapshot::default());
        let result = sim.update(1_020.0, &InputSnapshot::default());
        assert!(result.stepped);
        assert!((result.dt - 0.02).abs() < EPSILON);
    }

    #[test]
    fn test_delta_time_capped() {
        let mut sim = simulation();
        sim.update(0.0, &InputSnapshot::default());
        // A ten second stall
        let result = sim.update(10_000.0, &InputSnapshot::default());
        assert!((result.dt - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_repeated_timestamp_skipped() {
        let mut sim = simulation();
        sim.update(100.0, &InputSnapshot::default());
        let result = sim.update(100.0, &InputSnapshot::default());
        assert!(!result.stepped);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_input_edges_applied_without_a_step() {
        let mut sim = simulation();
        let fire = InputSnapshot {
            fire_pressed: true,
            ..Default::default()
        };
        // Fire arrives on the frame that sets the time base
        let result = sim.update(0.0, &fire);
        assert!(!result.stepped);
        assert_eq!(sim.grapple_phase(), GrapplePhase::Firing);
        assert_eq!(sim.grapple().progress(), 0);

        // Release arrives on a frame with a repeated timestamp
        let release = InputSnapshot {
            fire_released: true,
            ..Default::default()
        };
        let result = sim.update(0.0, &release);
        assert!(!result.stepped);
        assert_eq!(sim.grapple_phase(), GrapplePhase::Returning);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_camera_starts_on_local_vertical() {
        let sim = simulation();
        let up = sim.planet().local_up(sim.player().position).unwrap();
        assert!((sim.camera().up_axis() - up).length() < EPSILON);
    }

    #[test]
    fn test_gravity_pulls_toward_center() {
        let mut sim = simulation();
        sim.update(0.0, &InputSnapshot::default());
        sim.update(16.0, &InputSnapshot::default());
        let toward_center = (sim.planet().center - sim.player().position).normalized();
        assert!(sim.player().velocity.normalized().dot(toward_center) > 0.999);
    }

    #[test]
    fn test_forward_input_is_tangent() {
        let mut config = AppConfig::default();
        config.planet.gravity = 0.0;
        let terrain = config.terrain.build(Vec3::ZERO);
        let mut sim = Simulation::new(terrain, &config);

        let input = InputSnapshot {
            held: Intent::FORWARD,
            ..Default::default()
        };
        sim.update(0.0, &input);
        sim.update(16.0, &input);

        let up = sim.planet().local_up(sim.player().position).unwrap();
        let velocity = sim.player().velocity;
        assert!(velocity.length() > 0.0);
        assert!(velocity.normalized().dot(up).abs() < 0.01);
    }

    #[test]
    fn test_fire_edge_starts_grapple() {
        let mut sim = simulation();
        sim.update(0.0, &InputSnapshot::default());
        let fire = InputSnapshot {
            fire_pressed: true,
            ..Default::default()
        };
        sim.update(16.0, &fire);
        assert_eq!(sim.grapple_phase(), GrapplePhase::Firing);

        // Holding does not refire; the release edge sends it back
        sim.update(32.0, &InputSnapshot::default());
        let release = InputSnapshot {
            fire_released: true,
            ..Default::default()
        };
        sim.update(48.0, &release);
        assert_eq!(sim.grapple_phase(), GrapplePhase::Returning);
    }

    #[test]
    fn test_look_delta_turns_camera() {
        let mut sim = simulation();
        sim.update(0.0, &InputSnapshot::default());
        let before = sim.camera().forward();
        let look = InputSnapshot {
            look_delta: (0.5, 0.0),
            ..Default::default()
        };
        sim.update(16.0, &look);
        assert!(sim.camera().forward().dot(before) < 0.95);
    }
}
