//! Grapple rope: a chain of verlet particles
//!
//! While the hook travels out or back, the rope is only drawn: every tick
//! its particles are laid on the straight line between the live origin and
//! destination. Once attached, interior particles are integrated with verlet
//! and a single in-order relaxation pass pulls each adjacent pair toward the
//! rest segment length. Both ends are re-pinned after relaxation, so the
//! endpoints are exact while the interior may visibly stretch under fast
//! motion.

use tether_math::Vec3;

/// Tunables for the rope
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RopeConfig {
    /// Number of segments (particles = segments + 1)
    pub segments: usize,
    /// Verlet velocity retention per tick (1.0 = no damping)
    pub damping: f32,
    /// Render samples per segment
    pub point_scale: usize,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            segments: 25,
            damping: 0.98,
            point_scale: 10,
        }
    }
}

/// A single rope particle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RopeParticle {
    pub position: Vec3,
    /// Position on the previous tick (verlet velocity is the difference)
    pub previous: Vec3,
}

impl RopeParticle {
    fn at(position: Vec3) -> Self {
        Self {
            position,
            previous: position,
        }
    }
}

/// Rope state plus its render buffer
#[derive(Clone, Debug)]
pub struct Rope {
    particles: Vec<RopeParticle>,
    rest_length: f32,
    rest_segment_length: f32,
    damping: f32,
    point_scale: usize,
    render_points: Vec<Vec3>,
    visible_points: usize,
    visible: bool,
}

impl Rope {
    /// Create an undeployed, hidden rope
    pub fn new(config: RopeConfig) -> Self {
        let segments = config.segments.max(1);
        let point_scale = config.point_scale.max(1);
        Self {
            particles: vec![RopeParticle::default(); segments + 1],
            rest_length: 0.0,
            rest_segment_length: 0.0,
            damping: config.damping,
            point_scale,
            render_points: vec![Vec3::ZERO; segments * point_scale + 1],
            visible_points: 0,
            visible: false,
        }
    }

    pub fn segments(&self) -> usize {
        self.particles.len() - 1
    }

    pub fn particles(&self) -> &[RopeParticle] {
        &self.particles
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn rest_segment_length(&self) -> f32 {
        self.rest_segment_length
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set the rest length from the cast and lay the rope out straight
    pub fn deploy(&mut self, origin: Vec3, destination: Vec3) {
        self.rest_length = origin.distance(destination);
        self.rest_segment_length = self.rest_length / self.segments() as f32;
        self.lay_straight(origin, destination);
        self.visible = true;
    }

    /// Place particles evenly on the segment from `origin` to `destination`
    ///
    /// Velocities are zeroed, so a later attach starts from rest.
    pub fn lay_straight(&mut self, origin: Vec3, destination: Vec3) {
        let segments = self.segments() as f32;
        for (i, particle) in self.particles.iter_mut().enumerate() {
            *particle = RopeParticle::at(origin.lerp(destination, i as f32 / segments));
        }
    }

    /// One attached simulation tick
    pub fn simulate(&mut self, origin: Vec3, destination: Vec3) {
        let last = self.particles.len() - 1;

        for particle in &mut self.particles[1..last] {
            let next = particle.position + (particle.position - particle.previous) * self.damping;
            particle.previous = particle.position;
            particle.position = next;
        }

        // A rope longer than the live span shortens its segments instead of
        // pushing the ends apart
        let live = origin.distance(destination);
        self.rest_segment_length = live.min(self.rest_length) / self.segments() as f32;

        for i in 0..last {
            let delta = self.particles[i + 1].position - self.particles[i].position;
            let dist = delta.length();
            if dist <= f32::EPSILON {
                continue;
            }
            let offset = delta * (0.5 * (dist - self.rest_segment_length) / dist);
            self.particles[i].position += offset;
            self.particles[i + 1].position -= offset;
        }

        self.particles[0] = RopeParticle::at(origin);
        self.particles[last] = RopeParticle::at(destination);
    }

    /// Rebuild the render buffer, revealing `progress` segments
    pub fn refresh_render(&mut self, progress: usize) {
        let scale = self.point_scale;
        for (i, pair) in self.particles.windows(2).enumerate() {
            for k in 0..scale {
                let t = k as f32 / scale as f32;
                self.render_points[i * scale + k] = pair[0].position.lerp(pair[1].position, t);
            }
        }
        if let (Some(point), Some(particle)) = (self.render_points.last_mut(), self.particles.last()) {
            *point = particle.position;
        }

        self.visible_points = if self.visible && progress > 0 {
            (progress.min(self.segments()) * scale + 1).min(self.render_points.len())
        } else {
            0
        };
    }

    /// Remove the rope from view
    pub fn hide(&mut self) {
        self.visible = false;
        self.visible_points = 0;
    }

    /// All render samples, for a line-strip vertex buffer
    pub fn render_points(&self) -> &[Vec3] {
        &self.render_points
    }

    /// Number of leading render samples to draw
    pub fn visible_points(&self) -> usize {
        self.visible_points
    }

    /// The drawn prefix of the render samples
    pub fn visible_render_points(&self) -> &[Vec3] {
        &self.render_points[..self.visible_points]
    }

    /// Render samples as raw bytes for GPU upload
    pub fn render_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.render_points)
    }
}
