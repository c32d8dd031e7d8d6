//! Local-gravity physics for Tether
//!
//! This crate provides the simulation core for a player moving around a
//! sphere with position-dependent gravity, including:
//! - A terrain collaborator trait (ray queries + surface samples)
//! - Radial gravity and quadratic air drag
//! - Point-cloud terrain collision
//! - A camera rig whose up vector tracks the local vertical
//! - A grapple hook state machine driving a verlet rope

pub mod camera;
pub mod collision;
pub mod grapple;
pub mod gravity;
pub mod player;
pub mod rope;
pub mod terrain;

// Re-export commonly used types
pub use camera::{CameraRig, ReorientPolicy, DEFAULT_PITCH_LIMIT_DEGREES};
pub use collision::{CollisionConfig, CollisionResolver, CollisionResult, Contact};
pub use grapple::{Grapple, GrappleConfig, GrappleInput, GrapplePhase};
pub use gravity::Planet;
pub use player::{LocomotionConfig, Motion, PlayerState, DEFAULT_AIR_RESISTANCE, DEFAULT_MOVEMENT_FACTOR};
pub use rope::{Rope, RopeConfig, RopeParticle};
pub use terrain::{RayHit, SphereTerrain, SurfaceSample, SurfaceSide, Terrain};
