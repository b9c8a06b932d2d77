//! # morphfield
//!
//! Reveal images as a swarm of 3D particles.
//!
//! Each slide is rasterized onto a fixed canvas and every dark pixel on an
//! even grid becomes a particle target. When the slide changes, the swarm
//! scatters to a ring outside the view, then reforms into the new image.
//! Surplus particles stay parked off-screen and are reused by later slides.
//!
//! ## Quick Start
//!
//! ```ignore
//! use morphfield::prelude::*;
//!
//! fn main() -> Result<(), RevealError> {
//!     Reveal::new()
//!         .with_config(RevealConfig::default().with_auto_advance(None))
//!         .with_slide_file("logo.png")?
//!         .with_slide_file("wordmark.png")?
//!         .run()
//! }
//! ```
//!
//! ## Headless use
//!
//! [`Session`] holds all state and never touches the GPU. Drive it with a
//! [`RenderLoop`] and any [`RenderBackend`]:
//!
//! ```ignore
//! let mut session = Session::new(RevealConfig::default(), Viewport::new(1300.0, 800.0), slides)?;
//! session.start(Duration::ZERO)?;
//!
//! let mut render_loop = RenderLoop::new();
//! loop {
//!     render_loop.frame(&mut session, &mut my_backend)?;
//! }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Type |
//! |-------|------|
//! | Rasterize + threshold | [`ImageSampler`] |
//! | Sample → world position | [`PositionPolicy`] |
//! | Pool + reconcile + ease | [`ParticleField`] |
//! | Projection + tracking | [`CameraRig`] |
//! | Scheduling | [`Session`], [`Carousel`] |
//! | Drawing | [`RenderLoop`], [`RenderBackend`] |

pub mod app;
pub mod background;
pub mod camera;
pub mod carousel;
pub mod config;
pub mod error;
pub mod field;
mod gpu;
pub mod particle;
pub mod placement;
pub mod render_loop;
pub mod sampler;
pub mod session;
pub mod time;
pub mod viewport;

pub use app::Reveal;
pub use background::{BackgroundCube, BackgroundField};
pub use camera::{CameraRig, Projection};
pub use carousel::Carousel;
pub use config::{
    Breakpoint, CameraConfig, CanvasConfig, MotionConfig, PlacementConfig, RevealConfig,
    SceneConfig, TimingConfig,
};
pub use error::{ConfigError, GpuError, RenderError, RevealError, SamplingError};
pub use field::ParticleField;
pub use glam::{Vec2, Vec3};
pub use gpu::GpuState;
pub use particle::Particle;
pub use placement::PositionPolicy;
pub use render_loop::{Frame, RenderBackend, RenderLoop};
pub use sampler::{ImageSampler, PixelSample};
pub use session::Session;
pub use time::FrameClock;
pub use viewport::Viewport;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use morphfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::Reveal;
    pub use crate::config::RevealConfig;
    pub use crate::error::{RenderError, RevealError, SamplingError};
    pub use crate::render_loop::{Frame, RenderBackend, RenderLoop};
    pub use crate::sampler::PixelSample;
    pub use crate::session::Session;
    pub use crate::viewport::Viewport;
    pub use crate::{Vec2, Vec3};
}
