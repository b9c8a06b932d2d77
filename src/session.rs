//! The reveal session: every piece of mutable state in one place.
//!
//! Components are built in a fixed order (viewport, camera, particle field)
//! and driven from a single thread of control. Selecting a slide samples the
//! image immediately, scatters the swarm, and schedules a reconcile that
//! runs once the settle delay has passed on the session's clock.
//!
//! # Example
//!
//! ```ignore
//! let mut session = Session::new(RevealConfig::default(), Viewport::new(1300.0, 800.0), slides)?;
//! session.start(Duration::ZERO)?;
//!
//! // every frame:
//! session.run_due(now);
//! session.tick();
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec3;
use image::DynamicImage;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::background::BackgroundField;
use crate::camera::CameraRig;
use crate::config::RevealConfig;
use crate::error::{ConfigError, SamplingError};
use crate::field::ParticleField;
use crate::placement::PositionPolicy;
use crate::sampler::{ImageSampler, PixelSample};
use crate::viewport::Viewport;

/// A reconcile waiting for its settle delay.
#[derive(Debug, Clone)]
struct PendingReconcile {
    due: Duration,
    slide: usize,
    samples: Vec<PixelSample>,
}

/// Context object owning the viewport, camera, swarm and slide deck.
pub struct Session {
    config: RevealConfig,
    viewport: Viewport,
    camera: CameraRig,
    field: ParticleField,
    policy: PositionPolicy,
    sampler: ImageSampler,
    background: BackgroundField,
    palette: Vec<Vec3>,
    slides: Vec<DynamicImage>,
    pending: VecDeque<PendingReconcile>,
    current_slide: Option<usize>,
}

impl Session {
    /// Build a session whose randomness is seeded from OS entropy.
    pub fn new(
        config: RevealConfig,
        viewport: Viewport,
        slides: Vec<DynamicImage>,
    ) -> Result<Self, ConfigError> {
        Self::build(config, viewport, slides, SmallRng::from_entropy())
    }

    /// Build a session with reproducible randomness.
    pub fn with_seed(
        config: RevealConfig,
        viewport: Viewport,
        slides: Vec<DynamicImage>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(config, viewport, slides, SmallRng::seed_from_u64(seed))
    }

    fn build(
        config: RevealConfig,
        viewport: Viewport,
        slides: Vec<DynamicImage>,
        mut rng: SmallRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = config.scene.palette_colors()?;
        let cube_color = config.scene.cube_rgb()?;

        let camera = CameraRig::new(&config.camera, config.motion.camera_lerp, &viewport);
        let field = ParticleField::new(palette.len(), config.motion.max_rotation_velocity);
        let mut policy = PositionPolicy::seeded(
            &config.canvas,
            &config.placement,
            viewport.width,
            rand::Rng::gen(&mut rng),
        );
        policy.set_view_extent(camera.park_extent());
        let sampler = ImageSampler::from_config(&config.canvas);
        let background = BackgroundField::generate(&config.scene, cube_color, &viewport, &mut rng);

        Ok(Self {
            config,
            viewport,
            camera,
            field,
            policy,
            sampler,
            background,
            palette,
            slides,
            pending: VecDeque::new(),
            current_slide: None,
        })
    }

    /// Show the first slide, if there is one.
    pub fn start(&mut self, now: Duration) -> Result<(), SamplingError> {
        if self.slides.is_empty() {
            log::warn!("session started without slides");
            return Ok(());
        }
        self.select(0, now).map(|_| ())
    }

    /// React to a slide selection.
    ///
    /// Samples the slide first; on failure nothing changes and the error is
    /// returned. On success the swarm scatters immediately and a reconcile
    /// is scheduled for `now + settle_delay`. Returns the sample count.
    pub fn select(&mut self, index: usize, now: Duration) -> Result<usize, SamplingError> {
        let image = self.slides.get(index).ok_or(SamplingError::SlideOutOfRange {
            index,
            len: self.slides.len(),
        })?;
        let samples = self.sampler.sample(image)?;
        let count = samples.len();
        log::info!("slide {} selected: {} samples", index, count);

        if self.config.timing.cancel_superseded && !self.pending.is_empty() {
            log::debug!("dropping {} superseded reconcile(s)", self.pending.len());
            self.pending.clear();
        }

        self.field.scatter(&mut self.policy);
        self.pending.push_back(PendingReconcile {
            due: now + self.config.timing.settle_delay(),
            slide: index,
            samples,
        });
        self.current_slide = Some(index);
        Ok(count)
    }

    /// Run every scheduled reconcile whose delay has elapsed, oldest first.
    ///
    /// Returns how many ran. When several are due the last one wins.
    pub fn run_due(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while self.pending.front().is_some_and(|p| p.due <= now) {
            if let Some(pending) = self.pending.pop_front() {
                log::debug!("reconciling slide {}", pending.slide);
                self.field.reconcile(&pending.samples, &mut self.policy);
                fired += 1;
            }
        }
        fired
    }

    /// Reconcile immediately, bypassing the scatter and delay.
    pub fn reconcile_now(&mut self, samples: &[PixelSample]) {
        self.field.reconcile(samples, &mut self.policy);
    }

    /// Advance particles and camera by one frame.
    pub fn tick(&mut self) {
        self.field.tick(self.config.motion.particle_lerp);
        self.camera.track_frame();
    }

    /// Apply a new viewport size.
    ///
    /// Parked particles are moved onto the resized park ring straight away.
    /// While a reconcile is pending the whole swarm is scattered again.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.resize(&viewport);
        self.policy.set_viewport_width(viewport.width);
        self.policy.set_view_extent(self.camera.park_extent());

        if self.pending.is_empty() {
            self.field.repark_surplus(&mut self.policy);
        } else {
            self.field.scatter(&mut self.policy);
        }
    }

    /// Pointer position in viewport coordinates (origin top-left).
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let offset = self.viewport.pointer_offset(x, y);
        self.camera.set_pointer(offset);
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn policy(&self) -> &PositionPolicy {
        &self.policy
    }

    pub fn background(&self) -> &BackgroundField {
        &self.background
    }

    pub fn palette(&self) -> &[Vec3] {
        &self.palette
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Most recently selected slide.
    pub fn current_slide(&self) -> Option<usize> {
        self.current_slide
    }

    /// Number of reconciles still waiting for their delay.
    pub fn pending_reconciles(&self) -> usize {
        self.pending.len()
    }
}
