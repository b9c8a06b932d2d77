//! Responsive camera with pointer parallax.
//!
//! Wide viewports get an orthographic projection whose horizontal extents
//! come from a breakpoint table; narrow ones switch to a fixed-FOV
//! perspective. The projection is rebuilt from scratch on every resize.
//!
//! Every frame the camera position eases towards a tracking target that the
//! pointer nudges, while the view always looks at a fixed world anchor.

use glam::{Mat4, Vec2, Vec3};

use crate::config::{Breakpoint, CameraConfig};
use crate::viewport::Viewport;

/// Steepest ray from the vertical considered when sizing the park ring.
const MAX_VIEW_ANGLE: f32 = 85.0 * std::f32::consts::PI / 180.0;

/// Projection parameters for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        fov_y_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
            } => Mat4::orthographic_rh(left, right, bottom, top, near, far),
            Projection::Perspective {
                fov_y_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far),
        }
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self, Projection::Orthographic { .. })
    }
}

/// Camera state driven by viewport size and pointer position.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    projection: Projection,
    band: Option<usize>,
    position: Vec3,
    tracking_target: Vec3,
    look_target: Vec3,
    lerp_factor: f32,
    park_extent: f32,
}

impl CameraRig {
    pub fn new(config: &CameraConfig, lerp_factor: f32, viewport: &Viewport) -> Self {
        let mut rig = Self {
            config: config.clone(),
            projection: Projection::Perspective {
                fov_y_degrees: config.fov_y_degrees,
                aspect: 1.0,
                near: config.perspective_near,
                far: config.perspective_far,
            },
            band: None,
            position: config.rest_position,
            tracking_target: config.rest_position,
            look_target: config.look_anchor,
            lerp_factor,
            park_extent: 0.0,
        };
        rig.resize(viewport);
        rig
    }

    /// Rebuild the projection for a new viewport size.
    ///
    /// The camera also jumps to the mode's start position; per-frame
    /// tracking eases it back afterwards. An empty breakpoint table falls
    /// back to perspective at every width.
    pub fn resize(&mut self, viewport: &Viewport) {
        let width = viewport.width;
        let band = if width > self.config.perspective_threshold {
            let index = select_band(&self.config.breakpoints, width);
            self.config.breakpoints.get(index).map(|b| (index, b.clone()))
        } else {
            None
        };

        let Some((index, band)) = band else {
            self.band = None;
            self.projection = Projection::Perspective {
                fov_y_degrees: self.config.fov_y_degrees,
                aspect: viewport.aspect(),
                near: self.config.perspective_near,
                far: self.config.perspective_far,
            };
            self.position = self.config.perspective_start;
            self.park_extent = self.footprint_radius(viewport);
            log::info!("camera: perspective for width {}", width);
            return;
        };

        let half_height = viewport.height / self.config.height_divisor;
        self.projection = Projection::Orthographic {
            left: width / band.left_divisor,
            right: width / band.right_divisor,
            top: half_height,
            bottom: -half_height,
            near: self.config.ortho_near,
            far: self.config.ortho_far,
        };
        self.position = self.config.ortho_start;
        self.park_extent = self.footprint_radius(viewport);
        if self.band != Some(index) {
            log::info!(
                "camera: orthographic band {} ({}..{:?}) for width {}",
                index,
                band.min_width,
                band.max_width,
                width
            );
        }
        self.band = Some(index);
    }

    /// Radius around the origin, on the z = 0 plane, that covers everything
    /// the current projection can show once the camera has settled.
    ///
    /// Accounts for the tilt towards the look anchor and for the furthest
    /// the pointer can push the camera, plus a 10% margin.
    fn footprint_radius(&self, viewport: &Viewport) -> f32 {
        let rest = self.config.rest_position;
        let anchor = self.config.look_anchor;
        let height = rest.z.abs();
        let lateral = (anchor.truncate() - rest.truncate()).length();
        let tilt = (lateral / (rest.z - anchor.z).abs().max(f32::EPSILON)).atan();

        let reach = match self.projection {
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                ..
            } => {
                let corner = Vec2::new(left.abs().max(right.abs()), top.abs().max(bottom.abs()));
                corner.length() / tilt.cos() + height * tilt.tan()
            }
            Projection::Perspective {
                fov_y_degrees,
                aspect,
                ..
            } => {
                let half_fov = (fov_y_degrees.to_radians() / 2.0).tan();
                let corner = (half_fov * (1.0 + aspect * aspect).sqrt()).atan();
                height * (corner + tilt).min(MAX_VIEW_ANGLE).tan()
            }
        };
        let pointer_reach = viewport.center().length() / self.config.pointer_divisor.abs();
        (reach + rest.truncate().length() + pointer_reach) * 1.1
    }

    /// Steer the tracking target from a centre-relative pointer offset.
    pub fn set_pointer(&mut self, offset: Vec2) {
        self.tracking_target.x = -offset.x / self.config.pointer_divisor;
        self.tracking_target.y = offset.y / self.config.pointer_divisor;
    }

    /// Ease the camera one frame towards its tracking target.
    pub fn track_frame(&mut self) {
        self.position = self.position.lerp(self.tracking_target, self.lerp_factor);
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Index of the active breakpoint band, `None` in perspective mode.
    #[inline]
    pub fn band(&self) -> Option<usize> {
        self.band
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn tracking_target(&self) -> Vec3 {
        self.tracking_target
    }

    /// Minimum park radius that keeps a parked particle out of view.
    #[inline]
    pub fn park_extent(&self) -> f32 {
        self.park_extent
    }

    #[inline]
    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }
}

/// The last band starting at or below `width`; widths below the table use
/// the first band.
fn select_band(table: &[Breakpoint], width: f32) -> usize {
    table
        .iter()
        .rposition(|b| width >= b.min_width)
        .unwrap_or(0)
}
