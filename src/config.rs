//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`TETHER_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use tether_math::Vec3;
use tether_physics::{
    CameraRig, LocomotionConfig, Planet, ReorientPolicy, RopeConfig, SphereTerrain, SurfaceSide,
};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Planet center and gravity
    #[serde(default)]
    pub planet: PlanetConfig,
    /// Player start and locomotion tunables
    #[serde(default)]
    pub player: PlayerConfig,
    /// Terrain collision tunables
    #[serde(default)]
    pub collision: CollisionConfig,
    /// Camera reorientation and look limits
    #[serde(default)]
    pub camera: CameraConfig,
    /// Grapple hook tunables
    #[serde(default)]
    pub grapple: GrappleConfig,
    /// Rope simulation and rendering tunables
    #[serde(default)]
    pub rope: RopeSettings,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Sampled sphere terrain
    #[serde(default)]
    pub terrain: TerrainConfig,
    /// Headless session timing
    #[serde(default)]
    pub session: SessionConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`TETHER_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // TETHER_GRAPPLE__MAX_DISTANCE=30 -> grapple.max_distance = 30
        figment = figment.merge(Env::prefixed("TETHER_").split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: reason.to_string(),
                })
            }
        }

        check(self.planet.gravity.is_finite(), "planet.gravity", "must be finite")?;
        check(
            Vec3::from_array(self.player.start_position)
                .distance(Vec3::from_array(self.planet.center))
                > tether_physics::gravity::MIN_CENTER_DISTANCE,
            "player.start_position",
            "must not coincide with the planet center",
        )?;
        check(self.player.movement_factor >= 0.0, "player.movement_factor", "must be non-negative")?;
        check(self.player.air_resistance >= 0.0, "player.air_resistance", "must be non-negative")?;
        check(
            self.collision.distance_threshold >= 0.0,
            "collision.distance_threshold",
            "must be non-negative",
        )?;
        check(self.collision.max_neighbors >= 1, "collision.max_neighbors", "must be at least 1")?;
        check(
            (0.0..=90.0).contains(&self.camera.pitch_limit),
            "camera.pitch_limit",
            "must be within 0..=90 degrees",
        )?;
        if let ReorientPolicy::BeyondDistance { min_distance_squared } = self.camera.reorient {
            check(min_distance_squared >= 0.0, "camera.reorient", "threshold must be non-negative")?;
        }
        check(self.grapple.delay >= 1, "grapple.delay", "must be at least 1")?;
        check(self.grapple.max_distance > 0.0, "grapple.max_distance", "must be positive")?;
        check(self.grapple.strength >= 0.0, "grapple.strength", "must be non-negative")?;
        check(self.grapple.tension >= 0.0, "grapple.tension", "must be non-negative")?;
        check(self.grapple.leash_stiffness >= 0.0, "grapple.leash_stiffness", "must be non-negative")?;
        check(
            (0.0..=1.0).contains(&self.rope.damping),
            "rope.damping",
            "must be within 0..=1",
        )?;
        check(self.rope.point_scale >= 1, "rope.point_scale", "must be at least 1")?;
        check(self.input.mouse_sensitivity >= 0.0, "input.mouse_sensitivity", "must be non-negative")?;
        check(self.terrain.radius > 0.0, "terrain.radius", "must be positive")?;
        check(self.terrain.samples >= 1, "terrain.samples", "must be at least 1")?;
        check(self.session.frame_interval_ms > 0.0, "session.frame_interval_ms", "must be positive")?;
        check(self.session.max_frame_seconds > 0.0, "session.max_frame_seconds", "must be positive")?;
        Ok(())
    }
}

/// Planet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetConfig {
    /// Center of gravity [x, y, z]
    pub center: [f32; 3],
    /// Gravity strength (positive = toward the center, negative = outward)
    pub gravity: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            gravity: 20.0,
        }
    }
}

impl PlanetConfig {
    pub fn to_planet(&self) -> Planet {
        Planet::new(Vec3::from_array(self.center), self.gravity)
    }
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Starting position [x, y, z]
    pub start_position: [f32; 3],
    /// Acceleration per unit of drift input
    pub movement_factor: f32,
    /// Quadratic drag coefficient
    pub air_resistance: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let locomotion = LocomotionConfig::default();
        Self {
            start_position: [0.0, 0.0, -60.0],
            movement_factor: locomotion.movement_factor,
            air_resistance: locomotion.air_resistance,
        }
    }
}

impl PlayerConfig {
    pub fn start(&self) -> Vec3 {
        Vec3::from_array(self.start_position)
    }

    pub fn to_locomotion_config(&self) -> LocomotionConfig {
        LocomotionConfig {
            movement_factor: self.movement_factor,
            air_resistance: self.air_resistance,
        }
    }
}

/// Collision configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Samples farther than this from the player are ignored
    pub distance_threshold: f32,
    /// Nearest qualifying samples averaged into the collision normal
    pub max_neighbors: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        let defaults = tether_physics::CollisionConfig::default();
        Self {
            distance_threshold: defaults.distance_threshold,
            max_neighbors: defaults.max_neighbors,
        }
    }
}

impl CollisionConfig {
    pub fn to_collision_config(&self) -> tether_physics::CollisionConfig {
        tether_physics::CollisionConfig {
            distance_threshold: self.distance_threshold,
            max_neighbors: self.max_neighbors,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// When the camera re-aligns with the local vertical
    pub reorient: ReorientPolicy,
    /// Maximum pitch angle in degrees
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            reorient: ReorientPolicy::default(),
            pitch_limit: tether_physics::DEFAULT_PITCH_LIMIT_DEGREES,
        }
    }
}

impl CameraConfig {
    /// Build a camera rig at `position`
    pub fn to_camera_rig(&self, position: Vec3) -> CameraRig {
        CameraRig::new(position)
            .with_policy(self.reorient)
            .with_pitch_limit_degrees(self.pitch_limit)
    }
}

/// Grapple configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrappleConfig {
    /// Progress steps per full cast (also the rope segment count)
    pub delay: u32,
    /// Maximum cast distance
    pub max_distance: f32,
    /// Reel-in acceleration
    pub strength: f32,
    /// Idle tether acceleration while attached
    pub tension: f32,
    /// Extra tether acceleration per unit beyond the rest length
    pub leash_stiffness: f32,
    /// Camera-local hook origin [x, y, z]
    pub origin_offset: [f32; 3],
}

impl Default for GrappleConfig {
    fn default() -> Self {
        let defaults = tether_physics::GrappleConfig::default();
        Self {
            delay: defaults.delay,
            max_distance: defaults.max_distance,
            strength: defaults.strength,
            tension: defaults.tension,
            leash_stiffness: defaults.leash_stiffness,
            origin_offset: defaults.origin_offset.to_array(),
        }
    }
}

impl GrappleConfig {
    pub fn to_grapple_config(&self) -> tether_physics::GrappleConfig {
        tether_physics::GrappleConfig {
            delay: self.delay,
            max_distance: self.max_distance,
            strength: self.strength,
            tension: self.tension,
            leash_stiffness: self.leash_stiffness,
            origin_offset: Vec3::from_array(self.origin_offset),
        }
    }
}

/// Rope configuration
///
/// The segment count follows `grapple.delay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RopeSettings {
    /// Verlet velocity retention per tick
    pub damping: f32,
    /// Render samples per segment
    pub point_scale: usize,
}

impl Default for RopeSettings {
    fn default() -> Self {
        let defaults = RopeConfig::default();
        Self {
            damping: defaults.damping,
            point_scale: defaults.point_scale,
        }
    }
}

impl RopeSettings {
    pub fn to_rope_config(&self) -> RopeConfig {
        RopeConfig {
            damping: self.damping,
            point_scale: self.point_scale,
            ..RopeConfig::default()
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Mouse sensitivity in radians per pixel
    pub mouse_sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
        }
    }
}

/// Which side of the sphere the player lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Solid planet, player outside
    Solid,
    /// Hollow shell, player inside
    Hollow,
}

/// Terrain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainConfig {
    pub kind: TerrainKind,
    /// Sphere radius, centered on the planet
    pub radius: f32,
    /// Number of surface samples for collision
    pub samples: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            kind: TerrainKind::Solid,
            radius: 40.0,
            samples: 2000,
        }
    }
}

impl TerrainConfig {
    /// Build the sampled sphere around `center`
    pub fn build(&self, center: Vec3) -> SphereTerrain {
        let side = match self.kind {
            TerrainKind::Solid => SurfaceSide::Outside,
            TerrainKind::Hollow => SurfaceSide::Inside,
        };
        SphereTerrain::new(center, self.radius, side, self.samples)
    }
}

/// Headless session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of frames to run
    pub frames: u64,
    /// Simulated time between frames in milliseconds
    pub frame_interval_ms: f64,
    /// Upper bound on a single tick's dt in seconds
    pub max_frame_seconds: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_interval_ms: 1000.0 / 60.0,
            max_frame_seconds: 0.25,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log a status line every this many frames (0 = never)
    pub status_interval: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            status_interval: 60,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    /// A source could not be read or parsed
    Load(figment::Error),
    /// A value is out of range
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Configuration error: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "Configuration error: {} {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Load(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}
