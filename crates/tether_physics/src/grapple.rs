//! Grapple hook state machine
//!
//! ```text
//!   Idle --fire--> Firing --progress >= delay--> Attached --release--> Returning
//!                    |  \                                                  |
//!                    |   `--progress >= delay, no hit----------------------+
//!                    `--release------------------------------------------->|
//!   Idle <--------------------------progress reaches 0---------------------'
//! ```
//!
//! A bounded progress counter drives both the reveal animation of the rope
//! and the phase timing. Fire requests are only honoured from `Idle`.

use tether_math::Vec3;

use crate::camera::CameraRig;
use crate::rope::{Rope, RopeConfig};
use crate::terrain::Terrain;

/// Lifecycle of the hook
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrapplePhase {
    #[default]
    Idle,
    /// Travelling out toward the destination
    Firing,
    /// Anchored to terrain
    Attached,
    /// Travelling back to the player
    Returning,
}

/// Tunables for the grapple
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrappleConfig {
    /// Progress steps for a full cast; also the rope segment count
    pub delay: u32,
    /// Maximum cast distance
    pub max_distance: f32,
    /// Pull acceleration toward the anchor while reeling in
    pub strength: f32,
    /// Constant acceleration toward the anchor while attached, not pulling
    pub tension: f32,
    /// Extra acceleration per unit of distance beyond the rest length
    pub leash_stiffness: f32,
    /// Camera-local position of the rope's near end
    pub origin_offset: Vec3,
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            delay: 25,
            max_distance: 20.0,
            strength: 20.0,
            tension: 1.0,
            leash_stiffness: 1.0,
            origin_offset: Vec3::new(0.75, -0.35, 0.0),
        }
    }
}

/// Grapple inputs sampled for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrappleInput {
    /// Fire was pressed this tick
    pub fire: bool,
    /// Fire was released this tick
    pub release: bool,
    /// Pull (right button or modifier) is held
    pub pull: bool,
}

/// Grapple hook and its rope
#[derive(Clone, Debug)]
pub struct Grapple {
    pub config: GrappleConfig,
    phase: GrapplePhase,
    progress: u32,
    increment: u32,
    valid_intersection: bool,
    pulling_player: bool,
    origin: Vec3,
    destination: Vec3,
    rope: Rope,
}

impl Grapple {
    /// Create an idle grapple; the rope gets one segment per progress step
    pub fn new(config: GrappleConfig, rope_config: RopeConfig) -> Self {
        let config = GrappleConfig {
            delay: config.delay.max(1),
            ..config
        };
        let rope = Rope::new(RopeConfig {
            segments: config.delay as usize,
            ..rope_config
        });

        Self {
            config,
            phase: GrapplePhase::Idle,
            progress: 0,
            increment: 1,
            valid_intersection: false,
            pulling_player: false,
            origin: Vec3::ZERO,
            destination: Vec3::ZERO,
            rope,
        }
    }

    pub fn phase(&self) -> GrapplePhase {
        self.phase
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    pub fn has_valid_intersection(&self) -> bool {
        self.valid_intersection
    }

    pub fn is_pulling(&self) -> bool {
        self.pulling_player
    }

    /// Live near end of the rope, as of the last tick
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Anchor point (hit point) or the end of a missed cast
    pub fn destination(&self) -> Vec3 {
        self.destination
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Apply one tick of sampled input
    pub fn handle_input<T: Terrain + ?Sized>(&mut self, input: &GrappleInput, camera: &CameraRig, terrain: &T) {
        if input.fire {
            self.fire(camera, terrain);
        }
        if input.release {
            self.release();
        }
        self.set_pulling(input.pull);
    }

    /// Cast the hook from the camera
    ///
    /// Returns false (and does nothing) unless idle.
    pub fn fire<T: Terrain + ?Sized>(&mut self, camera: &CameraRig, terrain: &T) -> bool {
        if self.phase != GrapplePhase::Idle {
            log::trace!("fire ignored while {:?}", self.phase);
            return false;
        }

        let origin = camera.local_to_world(self.config.origin_offset);
        let forward = camera.forward();
        let max_distance = self.config.max_distance;

        self.origin = origin;
        self.destination = origin + forward * max_distance;
        self.valid_intersection = false;

        if let Some(hit) = terrain
            .raycast(origin, forward, max_distance)
            .filter(|hit| hit.distance > 0.0 && hit.distance < max_distance)
        {
            self.valid_intersection = true;
            self.destination = hit.point;
        }

        self.rope.deploy(self.origin, self.destination);
        self.increment = progress_increment(max_distance, self.rope.rest_length(), self.config.delay);
        self.progress = 0;
        self.pulling_player = false;
        self.phase = GrapplePhase::Firing;
        self.rope.refresh_render(0);

        log::debug!(
            "grapple fired: hit={} rest_length={:.2} increment={}",
            self.valid_intersection,
            self.rope.rest_length(),
            self.increment
        );
        true
    }

    /// Let go of the hook
    ///
    /// Only meaningful while firing or attached; returns true if the hook
    /// started returning.
    pub fn release(&mut self) -> bool {
        match self.phase {
            GrapplePhase::Firing | GrapplePhase::Attached => {
                log::debug!("grapple released from {:?} at progress {}", self.phase, self.progress);
                self.pulling_player = false;
                self.phase = GrapplePhase::Returning;
                true
            }
            GrapplePhase::Idle | GrapplePhase::Returning => false,
        }
    }

    /// Start or stop reeling in; ignored unless attached
    pub fn set_pulling(&mut self, pull: bool) {
        let pulling = pull && self.phase == GrapplePhase::Attached;
        if pulling != self.pulling_player {
            log::debug!("grapple pulling: {}", pulling);
        }
        self.pulling_player = pulling;
    }

    /// Advance one tick and return the acceleration applied to the player
    pub fn update(&mut self, camera: &CameraRig, player_position: Vec3) -> Vec3 {
        if self.phase == GrapplePhase::Idle {
            return Vec3::ZERO;
        }

        self.origin = camera.local_to_world(self.config.origin_offset);
        let delay = self.config.delay;

        match self.phase {
            GrapplePhase::Firing => {
                let next = self.progress + self.increment;
                if next >= delay {
                    if self.valid_intersection {
                        self.progress = delay - 1;
                        self.phase = GrapplePhase::Attached;
                        log::debug!("grapple attached at {:?}", self.destination);
                    } else {
                        self.progress = delay;
                        self.phase = GrapplePhase::Returning;
                        log::debug!("grapple missed, returning");
                    }
                } else {
                    self.progress = next;
                }
            }
            GrapplePhase::Returning => {
                self.progress = self.progress.saturating_sub(self.increment);
                if self.progress == 0 {
                    self.valid_intersection = false;
                    self.phase = GrapplePhase::Idle;
                    self.rope.hide();
                    log::debug!("grapple returned");
                    return Vec3::ZERO;
                }
            }
            GrapplePhase::Attached | GrapplePhase::Idle => {}
        }

        if self.phase == GrapplePhase::Attached {
            self.rope.simulate(self.origin, self.destination);
        } else {
            self.rope.lay_straight(self.origin, self.destination);
        }
        self.rope.refresh_render(self.progress as usize);

        self.acceleration(player_position)
    }

    /// Acceleration the rope applies to a player at `player_position`
    pub fn acceleration(&self, player_position: Vec3) -> Vec3 {
        if self.phase != GrapplePhase::Attached {
            return Vec3::ZERO;
        }

        let to_anchor = self.destination - player_position;
        let Some(direction) = to_anchor.try_normalized(1e-4) else {
            return Vec3::ZERO;
        };

        if self.pulling_player {
            direction * self.config.strength
        } else {
            let excess = (to_anchor.length() - self.rope.rest_length()).max(0.0);
            direction * (self.config.tension + self.config.leash_stiffness * excess)
        }
    }
}

/// Progress step per tick: short casts reveal in fewer ticks
fn progress_increment(max_distance: f32, rest_length: f32, delay: u32) -> u32 {
    if rest_length <= f32::EPSILON {
        return delay;
    }
    let steps = (max_distance / rest_length).round();
    (steps as u32).clamp(1, delay)
}
