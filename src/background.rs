//! Decorative cubes floating far behind the swarm.

use glam::Vec3;
use rand::Rng;

use crate::config::SceneConfig;
use crate::viewport::Viewport;

/// A static background cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundCube {
    pub position: Vec3,
    pub size: f32,
}

/// Randomly scattered cubes spanning twice the viewport in x and y.
#[derive(Debug, Clone, Default)]
pub struct BackgroundField {
    cubes: Vec<BackgroundCube>,
    color: Vec3,
}

impl BackgroundField {
    /// Scatter `scene.background_cubes` cubes for `viewport`.
    pub fn generate<R: Rng>(scene: &SceneConfig, color: Vec3, viewport: &Viewport, rng: &mut R) -> Self {
        let (w, h) = (viewport.width, viewport.height);
        let cubes = (0..scene.background_cubes)
            .map(|_| {
                let x = rng.gen::<f32>() * w * 2.0 - w;
                let y = rng.gen::<f32>() * h * 2.0 - h;
                let z = rng.gen_range(scene.cube_depth_far..scene.cube_depth_near);
                BackgroundCube {
                    position: Vec3::new(x, y, z),
                    size: scene.cube_size,
                }
            })
            .collect();
        Self { cubes, color }
    }

    #[inline]
    pub fn cubes(&self) -> &[BackgroundCube] {
        &self.cubes
    }

    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color
    }
}
