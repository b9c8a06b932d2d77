//! A single swarm particle.

use glam::{Vec2, Vec3};

/// One pooled particle.
///
/// Particles are never freed; a slot is only ever retargeted, either to an
/// image sample or to a park position.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Where the particle is drawn this frame.
    pub position: Vec3,
    /// Where the particle is heading.
    pub target: Vec3,
    /// Accumulated rotation about the x and y axes, in radians.
    pub rotation: Vec2,
    /// Rotation added every frame. Fixed at creation.
    pub rotation_velocity: Vec2,
    /// Index into the scene palette.
    pub color_index: usize,
}

impl Particle {
    pub fn new(position: Vec3, target: Vec3, rotation_velocity: Vec2, color_index: usize) -> Self {
        Self {
            position,
            target,
            rotation: Vec2::ZERO,
            rotation_velocity,
            color_index,
        }
    }

    /// Point the particle somewhere else without touching its motion state.
    #[inline]
    pub fn retarget(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Advance rotation by one frame. Unbounded; the renderer wraps it.
    #[inline]
    pub fn spin(&mut self) {
        self.rotation += self.rotation_velocity;
    }

    /// Move `factor` of the remaining way towards the target.
    #[inline]
    pub fn approach(&mut self, factor: f32) {
        self.position = self.position.lerp(self.target, factor);
    }

    #[inline]
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }
}
