//! Per-frame update and draw cycle.
//!
//! The host calls [`RenderLoop::frame`] from its frame-pacing callback.
//! Each frame runs any due reconcile, ticks the particle field, tracks the
//! camera, then hands one [`Frame`] to the [`RenderBackend`]. There is no
//! catch-up: a late frame simply advances one step.

use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::background::BackgroundField;
use crate::error::RenderError;
use crate::particle::Particle;
use crate::session::Session;
use crate::time::FrameClock;
use crate::viewport::Viewport;

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub index: u64,
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub look_target: Vec3,
    pub viewport: Viewport,
    pub particles: &'a [Particle],
    pub palette: &'a [Vec3],
    pub particle_radius: f32,
    pub background: &'a BackgroundField,
    pub clear_color: [f32; 4],
}

impl<'a> Frame<'a> {
    pub fn from_session(session: &'a Session, index: u64) -> Self {
        let scene = &session.config().scene;
        Self {
            index,
            view_proj: session.camera().view_proj(),
            camera_position: session.camera().position(),
            look_target: session.camera().look_target(),
            viewport: *session.viewport(),
            particles: session.field().particles(),
            palette: session.palette(),
            particle_radius: scene.particle_radius,
            background: session.background(),
            clear_color: scene.clear_color,
        }
    }

    /// Palette colour for a particle.
    pub fn color_of(&self, particle: &Particle) -> Vec3 {
        if self.palette.is_empty() {
            return Vec3::ONE;
        }
        self.palette[particle.color_index % self.palette.len()]
    }
}

/// A renderer the loop can draw into.
pub trait RenderBackend {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), RenderError>;
}

/// Drives update + draw once per host frame.
#[derive(Debug, Default)]
pub struct RenderLoop {
    clock: FrameClock,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            clock: FrameClock::new(),
        }
    }

    /// Run one frame at the current wall-clock time.
    pub fn frame<B: RenderBackend>(
        &mut self,
        session: &mut Session,
        backend: &mut B,
    ) -> Result<(), RenderError> {
        let now = self.clock.now();
        self.frame_at(now, session, backend)
    }

    /// Run one frame at an explicit session time.
    ///
    /// Non-fatal backend errors are logged and swallowed so the next frame
    /// still runs; only fatal ones are returned.
    pub fn frame_at<B: RenderBackend>(
        &mut self,
        now: Duration,
        session: &mut Session,
        backend: &mut B,
    ) -> Result<(), RenderError> {
        let now = self.clock.tick_at(now);
        session.run_due(now);
        session.tick();

        let frame = Frame::from_session(session, self.clock.frame());
        match backend.draw(&frame) {
            Ok(()) => {
                log::trace!("frame {} ({:.1} fps)", self.clock.frame(), self.clock.fps());
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                log::warn!("frame {} not drawn: {}", self.clock.frame(), e);
                Ok(())
            }
        }
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealConfig;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(u64, usize)>,
        fail_with: Option<RenderError>,
    }

    impl RenderBackend for Recorder {
        fn draw(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
            self.frames.push((frame.index, frame.particles.len()));
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    fn session() -> Session {
        Session::with_seed(RevealConfig::default(), Viewport::new(1300.0, 800.0), vec![], 1)
            .unwrap()
    }

    #[test]
    fn test_frame_ticks_and_draws() {
        let mut session = session();
        session.reconcile_now(&[crate::PixelSample::new(2, 2)]);
        let start = session.field().particles()[0].distance_to_target();

        let mut backend = Recorder::default();
        let mut render_loop = RenderLoop::new();
        render_loop
            .frame_at(Duration::from_millis(16), &mut session, &mut backend)
            .unwrap();

        assert_eq!(backend.frames, vec![(1, 1)]);
        assert!(session.field().particles()[0].distance_to_target() < start);
    }

    #[test]
    fn test_non_fatal_errors_keep_running() {
        let mut session = session();
        let mut backend = Recorder {
            fail_with: Some(RenderError::SurfaceLost),
            ..Default::default()
        };
        let mut render_loop = RenderLoop::new();
        for i in 1..=3 {
            assert!(render_loop
                .frame_at(Duration::from_millis(i * 16), &mut session, &mut backend)
                .is_ok());
        }
        assert_eq!(backend.frames.len(), 3);
    }

    #[test]
    fn test_fatal_error_is_returned() {
        let mut session = session();
        let mut backend = Recorder {
            fail_with: Some(RenderError::OutOfMemory),
            ..Default::default()
        };
        let mut render_loop = RenderLoop::new();
        assert_eq!(
            render_loop.frame_at(Duration::ZERO, &mut session, &mut backend),
            Err(RenderError::OutOfMemory)
        );
    }

    #[test]
    fn test_color_of_wraps_palette() {
        let session = session();
        let frame = Frame::from_session(&session, 0);
        let p = Particle::new(Vec3::ZERO, Vec3::ZERO, glam::Vec2::ZERO, 7);
        assert_eq!(frame.color_of(&p), session.palette()[2]);
    }
}
