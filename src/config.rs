//! Tunable configuration for a reveal.
//!
//! Every constant the reveal depends on lives here: canvas size, placement
//! scale and park radii, interpolation factors, the camera breakpoint table,
//! timings, and scene colours. Configurations serialize to JSON so a host can
//! ship several variants side by side.
//!
//! # Example
//!
//! ```ignore
//! let config = RevealConfig::default()
//!     .with_canvas(200, 200)
//!     .with_settle_delay(Duration::from_millis(350));
//! config.validate()?;
//! config.save("reveal.json")?;
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Off-screen raster that source images are drawn into before sampling.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Colour that transparent source pixels are composited onto.
    pub backdrop: [u8; 3],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
            backdrop: [255, 255, 255],
        }
    }
}

/// How pixel samples map into world space, and where spare particles park.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlacementConfig {
    /// Magnification from canvas pixels to world units.
    pub scale: f32,
    /// Upper bound of the per-axis random jitter, in canvas pixels.
    pub jitter: f32,
    /// Constant shift subtracted alongside the jitter, in canvas pixels.
    pub jitter_offset: f32,
    /// Image-plane depth band.
    pub depth_near: f32,
    pub depth_far: f32,
    /// Smallest park ring radius, regardless of viewport.
    pub park_radius: f32,
    /// Park ring radius as a multiple of the viewport width.
    pub park_width_factor: f32,
    /// Extra distance for particles vacated by a denser previous image.
    pub outward_factor: f32,
    /// Parked particles sit at `z` in `[0, park_depth)`.
    pub park_depth: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            scale: 3.0,
            jitter: 4.0,
            jitter_offset: 2.0,
            depth_near: 20.0,
            depth_far: 40.0,
            park_radius: 550.0,
            park_width_factor: 1.25,
            outward_factor: 1.5,
            park_depth: 0.5,
        }
    }
}

/// Per-frame interpolation factors.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MotionConfig {
    /// Fraction of the remaining distance a particle covers each frame.
    pub particle_lerp: f32,
    /// Fraction of the remaining distance the camera covers each frame.
    pub camera_lerp: f32,
    /// Rotation velocities are drawn from `[0, max_rotation_velocity)`.
    pub max_rotation_velocity: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            particle_lerp: 0.13,
            camera_lerp: 0.2,
            max_rotation_velocity: 0.05,
        }
    }
}

/// One band of the orthographic breakpoint table.
///
/// `left = width / left_divisor` and `right = width / right_divisor`.
/// `max_width: None` leaves the band open-ended.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Breakpoint {
    pub min_width: f32,
    pub max_width: Option<f32>,
    pub left_divisor: f32,
    pub right_divisor: f32,
}

impl Breakpoint {
    pub fn new(min_width: f32, max_width: Option<f32>, left_divisor: f32, right_divisor: f32) -> Self {
        Self {
            min_width,
            max_width,
            left_divisor,
            right_divisor,
        }
    }

    /// Whether `width` falls inside this band (both ends inclusive).
    pub fn contains(&self, width: f32) -> bool {
        width >= self.min_width && self.max_width.map_or(true, |max| width <= max)
    }
}

/// Camera projection and tracking parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    /// Ordered, non-overlapping orthographic bands.
    pub breakpoints: Vec<Breakpoint>,
    /// Widths at or below this switch to a perspective projection.
    pub perspective_threshold: f32,
    pub fov_y_degrees: f32,
    pub perspective_near: f32,
    pub perspective_far: f32,
    pub ortho_near: f32,
    pub ortho_far: f32,
    /// `top = height / height_divisor`, `bottom = -top`.
    pub height_divisor: f32,
    /// Pointer offsets are divided by this before steering the camera.
    pub pointer_divisor: f32,
    /// World point the camera always looks at.
    pub look_anchor: Vec3,
    /// Tracking target before any pointer input.
    pub rest_position: Vec3,
    /// Camera position right after an orthographic rebuild.
    pub ortho_start: Vec3,
    /// Camera position right after a perspective rebuild.
    pub perspective_start: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![
                Breakpoint::new(901.0, Some(1099.0), -1.2, 2.0),
                Breakpoint::new(1100.0, Some(1269.0), -1.0, 2.4),
                Breakpoint::new(1270.0, Some(1389.0), -0.9, 2.7),
                Breakpoint::new(1390.0, Some(1679.0), -1.8, 1.3),
                Breakpoint::new(1680.0, None, -2.05, 1.15),
            ],
            perspective_threshold: 900.0,
            fov_y_degrees: 75.0,
            perspective_near: 1.0,
            perspective_far: 3000.0,
            ortho_near: 0.01,
            ortho_far: 5000.0,
            height_divisor: 2.0,
            pointer_divisor: 20.0,
            look_anchor: Vec3::new(-50.0, 75.0, 10.0),
            rest_position: Vec3::new(0.0, 0.0, 800.0),
            ortho_start: Vec3::new(-1000.0, 0.0, 800.0),
            perspective_start: Vec3::new(0.0, 0.0, 800.0),
        }
    }
}

/// Transition and carousel timings, in milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    /// Delay between the full-field scatter and the reconcile.
    pub settle_delay_ms: u64,
    /// Carousel auto-advance interval. `None` disables auto-advance.
    pub auto_advance_ms: Option<u64>,
    /// Drop a pending reconcile when a newer selection arrives.
    pub cancel_superseded: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
            auto_advance_ms: Some(8000),
            cancel_superseded: true,
        }
    }
}

impl TimingConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn auto_advance(&self) -> Option<Duration> {
        self.auto_advance_ms.map(Duration::from_millis)
    }
}

/// Colours and decorative scene content.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    /// Particle colours as `#rrggbb`; particle `i` uses `palette[i % len]`.
    pub palette: Vec<String>,
    pub particle_radius: f32,
    pub background_cubes: usize,
    pub cube_size: f32,
    pub cube_color: String,
    pub cube_depth_near: f32,
    pub cube_depth_far: f32,
    /// RGBA clear colour.
    pub clear_color: [f32; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            palette: ["#b3282d", "#992226", "#801c20", "#d6311b", "#d84332"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            particle_radius: 4.0,
            background_cubes: 40,
            cube_size: 12.0,
            cube_color: "#dddddd".to_string(),
            cube_depth_near: -200.0,
            cube_depth_far: -2200.0,
            clear_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl SceneConfig {
    /// Parse the palette into linear RGB triples in `0.0..=1.0`.
    pub fn palette_colors(&self) -> Result<Vec<Vec3>, ConfigError> {
        self.palette
            .iter()
            .map(|hex| {
                parse_hex_color(hex)
                    .ok_or_else(|| ConfigError::Invalid(format!("bad palette colour '{}'", hex)))
            })
            .collect()
    }

    pub fn cube_rgb(&self) -> Result<Vec3, ConfigError> {
        parse_hex_color(&self.cube_color)
            .ok_or_else(|| ConfigError::Invalid(format!("bad cube colour '{}'", self.cube_color)))
    }
}

/// Complete reveal configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RevealConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl RevealConfig {
    /// The smaller variant: a coarser canvas, slower particles and a
    /// breakpoint table shifted towards narrower screens.
    pub fn compact() -> Self {
        let mut config = Self::default();
        config.canvas.width = 160;
        config.canvas.height = 160;
        config.placement.scale = 4.0;
        config.motion.particle_lerp = 0.1;
        config.camera.perspective_threshold = 768.0;
        config.camera.breakpoints = vec![
            Breakpoint::new(769.0, Some(1023.0), -1.3, 1.9),
            Breakpoint::new(1024.0, Some(1279.0), -1.1, 2.2),
            Breakpoint::new(1280.0, Some(1599.0), -1.6, 1.4),
            Breakpoint::new(1600.0, None, -2.05, 1.15),
        ];
        config.timing.auto_advance_ms = Some(4000);
        config
    }

    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas.width = width;
        self.canvas.height = height;
        self
    }

    pub fn with_particle_lerp(mut self, factor: f32) -> Self {
        self.motion.particle_lerp = factor;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.timing.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_auto_advance(mut self, interval: Option<Duration>) -> Self {
        self.timing.auto_advance_ms = interval.map(|d| d.as_millis() as u64);
        self
    }

    pub fn with_cancel_superseded(mut self, cancel: bool) -> Self {
        self.timing.cancel_superseded = cancel;
        self
    }

    pub fn with_background_cubes(mut self, count: usize) -> Self {
        self.scene.background_cubes = count;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.canvas.width == 0 || self.canvas.height == 0 {
            return invalid("canvas dimensions must be non-zero");
        }

        let p = &self.placement;
        let m = &self.motion;
        let c = &self.camera;
        let sc = &self.scene;
        let scalars = [
            ("placement.scale", p.scale),
            ("placement.jitter", p.jitter),
            ("placement.jitter_offset", p.jitter_offset),
            ("placement.depth_near", p.depth_near),
            ("placement.depth_far", p.depth_far),
            ("placement.park_radius", p.park_radius),
            ("placement.park_width_factor", p.park_width_factor),
            ("placement.outward_factor", p.outward_factor),
            ("placement.park_depth", p.park_depth),
            ("motion.particle_lerp", m.particle_lerp),
            ("motion.camera_lerp", m.camera_lerp),
            ("motion.max_rotation_velocity", m.max_rotation_velocity),
            ("camera.perspective_threshold", c.perspective_threshold),
            ("camera.fov_y_degrees", c.fov_y_degrees),
            ("camera.perspective_near", c.perspective_near),
            ("camera.perspective_far", c.perspective_far),
            ("camera.ortho_near", c.ortho_near),
            ("camera.ortho_far", c.ortho_far),
            ("camera.height_divisor", c.height_divisor),
            ("camera.pointer_divisor", c.pointer_divisor),
            ("scene.particle_radius", sc.particle_radius),
            ("scene.cube_size", sc.cube_size),
            ("scene.cube_depth_near", sc.cube_depth_near),
            ("scene.cube_depth_far", sc.cube_depth_far),
        ];
        if let Some((name, _)) = scalars.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be finite", name)));
        }
        let vectors = [
            ("camera.look_anchor", c.look_anchor),
            ("camera.rest_position", c.rest_position),
            ("camera.ortho_start", c.ortho_start),
            ("camera.perspective_start", c.perspective_start),
        ];
        if let Some((name, _)) = vectors.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be finite", name)));
        }
        if c.breakpoints.iter().any(|b| {
            !b.min_width.is_finite()
                || !b.left_divisor.is_finite()
                || !b.right_divisor.is_finite()
                || b.max_width.is_some_and(|w| !w.is_finite())
        }) {
            return invalid("breakpoint values must be finite");
        }
        if self.scene.palette.is_empty() {
            return invalid("palette must contain at least one colour");
        }
        self.scene.palette_colors()?;
        self.scene.cube_rgb()?;

        for (name, factor) in [
            ("particle_lerp", self.motion.particle_lerp),
            ("camera_lerp", self.motion.camera_lerp),
        ] {
            if !(factor > 0.0 && factor < 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in (0, 1), got {}",
                    name, factor
                )));
            }
        }
        if self.motion.max_rotation_velocity <= 0.0 {
            return invalid("max_rotation_velocity must be positive");
        }

        if p.depth_near >= p.depth_far {
            return invalid("placement depth band is empty");
        }
        if p.park_radius <= 0.0 || p.park_width_factor < 0.0 || p.outward_factor < 1.0 {
            return invalid("park radii must be positive and outward_factor >= 1");
        }
        if p.park_depth <= 0.0 || p.park_depth >= p.depth_near {
            return invalid("park depth must be positive and in front of the image plane");
        }
        if self.scene.cube_depth_far >= self.scene.cube_depth_near {
            return invalid("cube depth band is empty");
        }

        if c.breakpoints.is_empty() {
            return invalid("breakpoint table is empty");
        }
        for pair in c.breakpoints.windows(2) {
            match pair[0].max_width {
                Some(max) if max >= pair[0].min_width && max < pair[1].min_width => {}
                _ => return invalid("breakpoint table must be ordered and non-overlapping"),
            }
        }
        if c.breakpoints
            .iter()
            .any(|b| b.left_divisor == 0.0 || b.right_divisor == 0.0)
        {
            return invalid("breakpoint divisors must be non-zero");
        }
        if c.height_divisor == 0.0 || c.pointer_divisor == 0.0 {
            return invalid("camera divisors must be non-zero");
        }
        Ok(())
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Parse `#rrggbb` (leading `#` optional) into RGB in `0.0..=1.0`.
pub fn parse_hex_color(hex: &str) -> Option<Vec3> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Vec3::new(
        channel(0)? as f32 / 255.0,
        channel(2)? as f32 / 255.0,
        channel(4)? as f32 / 255.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RevealConfig::default().validate().is_ok());
        assert!(RevealConfig::compact().validate().is_ok());
    }

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#ff0080").unwrap();
        assert_eq!(c, Vec3::new(1.0, 0.0, 128.0 / 255.0));
        assert_eq!(parse_hex_color("dddddd"), Some(Vec3::splat(221.0 / 255.0)));
        assert!(parse_hex_color("#fff").is_none());
        assert!(parse_hex_color("#gg0000").is_none());
    }

    #[test]
    fn test_breakpoint_contains() {
        let band = Breakpoint::new(1270.0, Some(1389.0), -0.9, 2.7);
        assert!(band.contains(1270.0));
        assert!(band.contains(1389.0));
        assert!(!band.contains(1390.0));
        assert!(Breakpoint::new(1680.0, None, -2.05, 1.15).contains(5000.0));
    }

    #[test]
    fn test_rejects_bad_lerp() {
        let config = RevealConfig::default().with_particle_lerp(1.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        let config = RevealConfig::default().with_particle_lerp(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_overlapping_breakpoints() {
        let mut config = RevealConfig::default();
        config.camera.breakpoints[0].max_width = Some(1200.0);
        assert!(config.validate().is_err());

        let mut config = RevealConfig::default();
        config.camera.breakpoints[2].max_width = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_palette_and_canvas() {
        let mut config = RevealConfig::default();
        config.scene.palette.clear();
        assert!(config.validate().is_err());

        assert!(RevealConfig::default().with_canvas(0, 10).validate().is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_open_band() {
        let config = RevealConfig::compact();
        let json = serde_json::to_string(&config).unwrap();
        let back = RevealConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.camera.breakpoints.last().unwrap().max_width, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RevealConfig::from_json(r#"{ "canvas": { "width": 120, "height": 100, "backdrop": [0, 0, 0] } }"#)
            .unwrap();
        assert_eq!(config.canvas.width, 120);
        assert_eq!(config.motion, MotionConfig::default());
    }

    #[test]
    fn test_builder_timings() {
        let config = RevealConfig::default()
            .with_settle_delay(Duration::from_millis(250))
            .with_auto_advance(None);
        assert_eq!(config.timing.settle_delay(), Duration::from_millis(250));
        assert_eq!(config.timing.auto_advance(), None);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let mut nan_depth = RevealConfig::default();
        nan_depth.placement.depth_near = f32::NAN;
        nan_depth.placement.depth_far = f32::NAN;
        assert!(matches!(nan_depth.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("depth_near")));

        let mut nan_park = RevealConfig::default();
        nan_park.placement.park_depth = f32::NAN;
        assert!(nan_park.validate().is_err());

        let mut inf_cube = RevealConfig::default();
        inf_cube.scene.cube_depth_far = f32::NEG_INFINITY;
        assert!(inf_cube.validate().is_err());

        let mut nan_anchor = RevealConfig::default();
        nan_anchor.camera.look_anchor = Vec3::new(f32::NAN, 0.0, 0.0);
        assert!(nan_anchor.validate().is_err());

        let mut nan_band = RevealConfig::default();
        nan_band.camera.breakpoints[1].right_divisor = f32::NAN;
        assert!(nan_band.validate().is_err());
    }
}
