//! Integration tests for the per-tick pipeline
//!
//! These tests drive the components in frame order on a sampled planet:
//! 1. Grapple update produces the rope acceleration
//! 2. Player integrates gravity, input, rope and drag
//! 3. Collision resolves the move against the surface samples
//! 4. Camera follows the resolved position and local up

use tether_math::Vec3;
use tether_physics::{
    CameraRig, CollisionResolver, Grapple, GrappleConfig, GrappleInput, GrapplePhase, Planet,
    PlayerState, ReorientPolicy, RopeConfig, SphereTerrain, Terrain,
};

const DT: f32 = 1.0 / 60.0;

struct World {
    planet: Planet,
    terrain: SphereTerrain,
    player: PlayerState,
    camera: CameraRig,
    resolver: CollisionResolver,
    grapple: Grapple,
}

impl World {
    fn new(gravity: f32, grapple: GrappleConfig) -> Self {
        let planet = Planet::new(Vec3::ZERO, gravity);
        let start = Vec3::new(0.0, 0.0, -60.0);
        let mut camera = CameraRig::new(start).with_policy(ReorientPolicy::Always);
        camera.update(start, &planet);
        camera.look_at(Vec3::ZERO);

        Self {
            planet,
            terrain: SphereTerrain::solid(Vec3::ZERO, 40.0, 2000),
            player: PlayerState::new(start, &planet),
            camera,
            resolver: CollisionResolver::default(),
            grapple: Grapple::new(grapple, RopeConfig::default()),
        }
    }

    fn tick(&mut self, input: GrappleInput) {
        self.grapple.handle_input(&input, &self.camera, &self.terrain);
        let rope = self.grapple.update(&self.camera, self.player.position);

        let motion = self
            .player
            .step(DT, &self.planet, self.camera.orientation, rope);
        let resolved = self.resolver.resolve(
            &self.terrain,
            motion.from,
            motion.to,
            self.player.velocity,
            DT,
        );
        self.player.apply_resolution(resolved.position, resolved.velocity);

        self.camera.update(self.player.position, &self.planet);
    }
}

fn scenario_grapple() -> GrappleConfig {
    GrappleConfig {
        delay: 25,
        max_distance: 80.0,
        origin_offset: Vec3::ZERO,
        ..GrappleConfig::default()
    }
}

// ==================== Falling ====================

#[test]
fn test_player_falls_and_lands_on_planet() {
    let mut world = World::new(20.0, GrappleConfig::default());

    for _ in 0..600 {
        world.tick(GrappleInput::default());
        assert!(world.player.position.is_finite());
    }

    let radius = world.player.position.length();
    assert!(radius > 40.0, "player ended inside the planet at r = {}", radius);
    assert!(radius < 44.5, "player never reached the surface, r = {}", radius);
    assert!(world.player.speed() < 1.0, "player still moving at {}", world.player.speed());
}

#[test]
fn test_camera_up_tracks_player_while_falling() {
    let mut world = World::new(20.0, GrappleConfig::default());
    world.player.velocity = Vec3::new(6.0, 0.0, 0.0);

    for _ in 0..120 {
        world.tick(GrappleInput::default());
        let expected = world.planet.local_up(world.player.position).unwrap();
        assert!((world.camera.reference_up() - expected).length() < 1e-4);
        assert_eq!(world.camera.position, world.player.position);
    }
}

// ==================== Grapple ====================

#[test]
fn test_grapple_scenario_through_full_tick() {
    // Weightless so the player stays at the cast origin
    let mut world = World::new(0.0, scenario_grapple());

    world.tick(GrappleInput {
        fire: true,
        ..Default::default()
    });
    assert_eq!(world.grapple.phase(), GrapplePhase::Firing);
    assert!(world.grapple.has_valid_intersection());
    assert_eq!(world.grapple.increment(), 4);

    for _ in 0..6 {
        world.tick(GrappleInput::default());
    }
    assert_eq!(world.grapple.phase(), GrapplePhase::Attached);
    assert_eq!(world.grapple.progress(), 24);

    world.tick(GrappleInput {
        release: true,
        ..Default::default()
    });
    assert_eq!(world.grapple.phase(), GrapplePhase::Returning);

    for _ in 0..5 {
        world.tick(GrappleInput::default());
    }
    assert_eq!(world.grapple.phase(), GrapplePhase::Idle);
    assert!(!world.grapple.rope().is_visible());
}

#[test]
fn test_pulling_reels_player_toward_anchor() {
    let mut world = World::new(0.0, scenario_grapple());
    world.tick(GrappleInput {
        fire: true,
        ..Default::default()
    });
    for _ in 0..6 {
        world.tick(GrappleInput::default());
    }
    assert_eq!(world.grapple.phase(), GrapplePhase::Attached);

    let anchor = world.grapple.destination();
    let start = world.player.position.distance(anchor);

    let pull = GrappleInput {
        pull: true,
        ..Default::default()
    };
    for _ in 0..30 {
        world.tick(pull);
        let particles = world.grapple.rope().particles();
        assert_eq!(particles[0].position, world.grapple.origin());
        assert_eq!(particles[particles.len() - 1].position, anchor);
    }

    let end = world.player.position.distance(anchor);
    assert!(end < start - 1.0, "pull did not shorten the gap: {} -> {}", start, end);
    assert!(world.grapple.is_pulling());
}

#[test]
fn test_missed_cast_never_attaches() {
    let mut world = World::new(0.0, scenario_grapple());
    world.camera.look_at(Vec3::new(0.0, 0.0, -100.0));

    world.tick(GrappleInput {
        fire: true,
        ..Default::default()
    });
    assert!(!world.grapple.has_valid_intersection());

    let mut ticks = 0;
    while world.grapple.phase() != GrapplePhase::Idle {
        assert_ne!(world.grapple.phase(), GrapplePhase::Attached);
        world.tick(GrappleInput::default());
        ticks += 1;
        assert!(ticks < 200, "grapple never returned");
    }
    assert_eq!(world.player.velocity, Vec3::ZERO);
}

#[test]
fn test_hollow_world_grapple_hits_shell() {
    let planet = Planet::new(Vec3::ZERO, -20.0);
    let terrain = SphereTerrain::hollow(Vec3::ZERO, 100.0, 500);
    let mut camera = CameraRig::new(Vec3::new(0.0, 0.0, -90.0));
    camera.update(camera.position, &planet);
    camera.look_at(Vec3::new(0.0, 0.0, -200.0));

    let hit = terrain
        .raycast(camera.position, camera.forward(), 20.0)
        .expect("shell should be hit");
    assert!((hit.distance - 10.0).abs() < 1e-3);

    let mut grapple = Grapple::new(scenario_grapple(), RopeConfig::default());
    assert!(grapple.fire(&camera, &terrain));
    assert!(grapple.has_valid_intersection());
}
