//! Viewport size in logical pixels.

use glam::Vec2;

/// Logical size of the drawing surface.
///
/// Refreshed on every resize; drives the camera breakpoint choice and the
/// park ring radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Logical viewport for a physical surface size and a device pixel ratio.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            width: (width as f64 / scale) as f32,
            height: (height as f64 / scale) as f32,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.half_width(), self.half_height())
    }

    /// Width over height, or 1 for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// A pointer position measured from the viewport centre.
    pub fn pointer_offset(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) - self.center()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
