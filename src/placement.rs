//! Target placement for particles.
//!
//! [`PositionPolicy`] turns a [`PixelSample`] into a jittered world-space
//! target on the image plane, and produces park positions on a ring outside
//! the visible frustum for particles that have nothing to show.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{CanvasConfig, PlacementConfig};
use crate::sampler::PixelSample;

/// Maps samples to world targets and hands out park positions.
///
/// Owns its RNG so a seeded policy reproduces the same layout.
#[derive(Debug, Clone)]
pub struct PositionPolicy {
    placement: PlacementConfig,
    half_canvas_width: f32,
    half_canvas_height: f32,
    viewport_width: f32,
    view_extent: f32,
    rng: SmallRng,
}

impl PositionPolicy {
    /// Policy seeded from OS entropy.
    pub fn new(canvas: &CanvasConfig, placement: &PlacementConfig, viewport_width: f32) -> Self {
        Self::with_rng(canvas, placement, viewport_width, SmallRng::from_entropy())
    }

    /// Policy with a fixed seed, for reproducible layouts.
    pub fn seeded(
        canvas: &CanvasConfig,
        placement: &PlacementConfig,
        viewport_width: f32,
        seed: u64,
    ) -> Self {
        Self::with_rng(canvas, placement, viewport_width, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(
        canvas: &CanvasConfig,
        placement: &PlacementConfig,
        viewport_width: f32,
        rng: SmallRng,
    ) -> Self {
        Self {
            placement: placement.clone(),
            half_canvas_width: canvas.width as f32 / 2.0,
            half_canvas_height: canvas.height as f32 / 2.0,
            viewport_width,
            view_extent: 0.0,
            rng,
        }
    }

    /// Track the current viewport width; the park ring grows with it.
    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width;
    }

    /// Track how far from the origin the camera can currently see, in
    /// world units. See [`CameraRig::park_extent`](crate::CameraRig::park_extent).
    pub fn set_view_extent(&mut self, extent: f32) {
        self.view_extent = extent;
    }

    /// Smallest distance from the origin at which a particle may park.
    pub fn min_park_radius(&self) -> f32 {
        self.placement
            .park_radius
            .max(self.viewport_width * self.placement.park_width_factor)
            .max(self.view_extent)
    }

    /// World-space target for an image sample.
    ///
    /// Jitter is re-rolled on every call, per axis, so re-selecting the same
    /// image never lands particles on exactly the same spots.
    pub fn projected_target(&mut self, sample: PixelSample) -> Vec3 {
        let p = &self.placement;
        let jitter_x = self.rng.gen::<f32>() * p.jitter;
        let jitter_y = self.rng.gen::<f32>() * p.jitter;
        let x = (sample.x as f32 - self.half_canvas_width - jitter_x - p.jitter_offset) * p.scale;
        let y = (sample.y as f32 - self.half_canvas_height - jitter_y - p.jitter_offset) * p.scale;
        let z = self.rng.gen_range(p.depth_near..p.depth_far);
        Vec3::new(x, y, z)
    }

    /// A random point on the park ring.
    ///
    /// `outward` pushes the ring further out, for particles vacated by a
    /// denser previous image.
    pub fn parked_target(&mut self, outward: bool) -> Vec3 {
        let mut radius = self.min_park_radius();
        if outward {
            radius *= self.placement.outward_factor;
        }
        let angle = self.rng.gen_range(0.0..TAU);
        let z = self.rng.gen::<f32>() * self.placement.park_depth;
        Vec3::new(radius * angle.cos(), radius * angle.sin(), z)
    }

    /// Random rotation velocity pair in `[0, max)` per axis.
    pub fn rotation_velocity(&mut self, max: f32) -> (f32, f32) {
        (self.rng.gen::<f32>() * max, self.rng.gen::<f32>() * max)
    }

    /// Whether `target` lies on the image plane rather than the park ring.
    pub fn is_image_target(&self, target: Vec3) -> bool {
        target.z >= self.placement.depth_near && target.z <= self.placement.depth_far
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(viewport_width: f32) -> PositionPolicy {
        PositionPolicy::seeded(
            &CanvasConfig::default(),
            &PlacementConfig::default(),
            viewport_width,
            7,
        )
    }

    #[test]
    fn test_projected_target_bounds() {
        let mut policy = policy(1280.0);
        for _ in 0..200 {
            let t = policy.projected_target(PixelSample::new(120, 120));
            // (120 - 120 - jitter - 2) * 3 with jitter in [0, 4)
            assert!(t.x <= -6.0 && t.x > -18.0, "x = {}", t.x);
            assert!(t.y <= -6.0 && t.y > -18.0, "y = {}", t.y);
            assert!(t.z >= 20.0 && t.z < 40.0);
            assert!(policy.is_image_target(t));
        }
    }

    #[test]
    fn test_jitter_rerolls_each_call() {
        let mut policy = policy(1280.0);
        let a = policy.projected_target(PixelSample::new(40, 60));
        let b = policy.projected_target(PixelSample::new(40, 60));
        assert_ne!(a, b);
    }

    #[test]
    fn test_park_radius_tracks_viewport() {
        let mut policy = policy(200.0);
        assert_eq!(policy.min_park_radius(), 550.0);
        policy.set_viewport_width(1300.0);
        assert_eq!(policy.min_park_radius(), 1625.0);
    }

    #[test]
    fn test_park_radius_covers_view_extent() {
        let mut policy = policy(400.0);
        assert_eq!(policy.min_park_radius(), 550.0);
        policy.set_view_extent(970.0);
        assert_eq!(policy.min_park_radius(), 970.0);
        let parked = policy.parked_target(false);
        assert!((parked.truncate().length() - 970.0).abs() < 0.01);
    }

    #[test]
    fn test_parked_targets_stay_outside() {
        let mut policy = policy(1300.0);
        let min = policy.min_park_radius();
        for _ in 0..200 {
            let inward = policy.parked_target(false);
            let outward = policy.parked_target(true);
            assert!((inward.truncate().length() - min).abs() < 0.01);
            assert!((outward.truncate().length() - min * 1.5).abs() < 0.01);
            assert!(inward.z >= 0.0 && inward.z < 0.5);
            assert!(!policy.is_image_target(inward));
            assert!(!policy.is_image_target(outward));
        }
    }

    #[test]
    fn test_seeded_policies_agree() {
        let mut a = policy(1280.0);
        let mut b = policy(1280.0);
        assert_eq!(a.parked_target(true), b.parked_target(true));
        assert_eq!(
            a.projected_target(PixelSample::new(2, 2)),
            b.projected_target(PixelSample::new(2, 2))
        );
    }

    #[test]
    fn test_rotation_velocity_range() {
        let mut policy = policy(1280.0);
        for _ in 0..100 {
            let (vx, vy) = policy.rotation_velocity(0.05);
            assert!((0.0..0.05).contains(&vx));
            assert!((0.0..0.05).contains(&vy));
        }
    }
}
