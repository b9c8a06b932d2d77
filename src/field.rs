//! The particle pool and its reconcile/tick cycle.
//!
//! The pool only ever grows. On every reconcile the first `n` slots are
//! retargeted to the new image's samples (allocating slots as needed) and
//! every slot past `n` is sent to the park ring.
//!
//! A selection goes through two phases:
//!
//! 1. [`ParticleField::scatter`] parks the whole pool immediately.
//! 2. After the settle delay, [`ParticleField::reconcile`] pulls particles
//!    onto the new image.
//!
//! Between and after these, [`ParticleField::tick`] eases every particle a
//! fixed fraction closer to its target each frame.

use glam::Vec2;

use crate::particle::Particle;
use crate::placement::PositionPolicy;
use crate::sampler::PixelSample;

/// Owner of every particle in the reveal.
#[derive(Debug, Clone)]
pub struct ParticleField {
    pool: Vec<Particle>,
    active_count: usize,
    palette_len: usize,
    max_rotation_velocity: f32,
}

impl ParticleField {
    /// Empty field. `palette_len` is clamped to at least one colour.
    pub fn new(palette_len: usize, max_rotation_velocity: f32) -> Self {
        Self {
            pool: Vec::new(),
            active_count: 0,
            palette_len: palette_len.max(1),
            max_rotation_velocity,
        }
    }

    /// Pool size; never decreases.
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Number of samples in the most recent reconcile.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.pool
    }

    /// Send every particle to an inward park position.
    pub fn scatter(&mut self, policy: &mut PositionPolicy) {
        for particle in &mut self.pool {
            particle.retarget(policy.parked_target(false));
        }
    }

    /// Move every slot past the active count to a fresh outward park
    /// position, after the park ring has grown.
    pub fn repark_surplus(&mut self, policy: &mut PositionPolicy) {
        for particle in self.pool.iter_mut().skip(self.active_count) {
            particle.retarget(policy.parked_target(true));
        }
    }

    /// Retarget the pool onto `samples`.
    ///
    /// Existing slots keep their position and spin so they glide to the new
    /// target. Missing slots are allocated at a park position. Slots past
    /// `samples.len()` are parked outward; an empty sample set parks the
    /// whole pool.
    pub fn reconcile(&mut self, samples: &[PixelSample], policy: &mut PositionPolicy) {
        let before = self.pool.len();

        for (i, sample) in samples.iter().enumerate() {
            let target = policy.projected_target(*sample);
            match self.pool.get_mut(i) {
                Some(particle) => particle.retarget(target),
                None => {
                    let (vx, vy) = policy.rotation_velocity(self.max_rotation_velocity);
                    let spawn = policy.parked_target(false);
                    self.pool.push(Particle::new(
                        spawn,
                        target,
                        Vec2::new(vx, vy),
                        i % self.palette_len,
                    ));
                }
            }
        }

        for particle in self.pool.iter_mut().skip(samples.len()) {
            particle.retarget(policy.parked_target(true));
        }

        self.active_count = samples.len();

        if self.pool.len() > before {
            log::debug!("particle pool grew {} -> {}", before, self.pool.len());
        }
        log::debug!(
            "reconciled {} samples, {} parked",
            self.active_count,
            self.pool.len() - self.active_count.min(self.pool.len())
        );
    }

    /// Advance one frame: spin every particle and ease it towards its target.
    pub fn tick(&mut self, lerp_factor: f32) {
        for particle in &mut self.pool {
            particle.spin();
            particle.approach(lerp_factor);
        }
    }
}
