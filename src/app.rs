//! Windowed host for a reveal.
//!
//! [`Reveal`] is the builder; [`Reveal::run`] opens a window, wires winit
//! events into the [`Session`] and blocks until the window closes.
//!
//! Arrow keys step through the slides. Pointer movement steers the camera.

use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::carousel::Carousel;
use crate::config::RevealConfig;
use crate::error::RevealError;
use crate::gpu::GpuState;
use crate::render_loop::RenderLoop;
use crate::session::Session;
use crate::viewport::Viewport;

/// Builder for a windowed reveal.
///
/// # Example
///
/// ```ignore
/// use morphfield::prelude::*;
///
/// Reveal::new()
///     .with_slide_file("logo.png")?
///     .with_slide_file("wordmark.png")?
///     .run()?;
/// ```
pub struct Reveal {
    config: RevealConfig,
    slides: Vec<DynamicImage>,
    seed: Option<u64>,
    title: String,
}

impl Reveal {
    pub fn new() -> Self {
        Self {
            config: RevealConfig::default(),
            slides: Vec::new(),
            seed: None,
            title: "morphfield".to_string(),
        }
    }

    pub fn with_config(mut self, config: RevealConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_slide(mut self, image: DynamicImage) -> Self {
        self.slides.push(image);
        self
    }

    /// Decode an image file and append it as a slide.
    pub fn with_slide_file(self, path: impl AsRef<Path>) -> Result<Self, RevealError> {
        let path = path.as_ref();
        let image = image::open(path)?;
        log::debug!(
            "loaded slide {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(self.with_slide(image))
    }

    /// Fix the random seed for reproducible placement.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), RevealError> {
        if self.slides.is_empty() {
            return Err(RevealError::NoSlides);
        }
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Reveal {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    /// Consumed on first resume.
    pending: Option<Reveal>,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    session: Option<Session>,
    carousel: Carousel,
    render_loop: RenderLoop,
    error: Option<RevealError>,
}

impl App {
    fn new(reveal: Reveal) -> Self {
        let carousel = Carousel::new(reveal.slides.len(), reveal.config.timing.auto_advance());
        Self {
            pending: Some(reveal),
            window: None,
            gpu_state: None,
            session: None,
            carousel,
            render_loop: RenderLoop::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop, reveal: Reveal) -> Result<(), RevealError> {
        let window_attrs = Window::default_attributes()
            .with_title(reveal.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;

        let size = window.inner_size();
        let viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());
        let mut session = match reveal.seed {
            Some(seed) => Session::with_seed(reveal.config, viewport, reveal.slides, seed)?,
            None => Session::new(reveal.config, viewport, reveal.slides)?,
        };
        if let Err(e) = session.start(self.render_loop.clock().now()) {
            log::warn!("first slide could not be shown: {}", e);
        }

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.session = Some(session);
        Ok(())
    }

    fn show(&mut self, index: Option<usize>) {
        let (Some(index), Some(session)) = (index, &mut self.session) else {
            return;
        };
        if let Err(e) = session.select(index, self.render_loop.clock().now()) {
            log::warn!("slide {} not shown: {}", index, e);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(reveal) = self.pending.take() else {
            return;
        };
        if let Err(e) = self.init(event_loop, reveal) {
            log::error!("startup failed: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let (Some(session), Some(window)) = (&mut self.session, &self.window) {
                    session.resize(Viewport::from_physical(
                        physical_size.width,
                        physical_size.height,
                        window.scale_factor(),
                    ));
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (Some(session), Some(window)) = (&mut self.session, &self.window) {
                    let logical = position.to_logical::<f32>(window.scale_factor());
                    session.pointer_moved(logical.x, logical.y);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let now = self.render_loop.clock().now();
                let changed = match key {
                    NamedKey::ArrowRight => self.carousel.next(now),
                    NamedKey::ArrowLeft => self.carousel.previous(now),
                    NamedKey::Escape => {
                        event_loop.exit();
                        None
                    }
                    _ => None,
                };
                self.show(changed);
            }
            WindowEvent::RedrawRequested => {
                let advanced = self.carousel.poll(self.render_loop.clock().now());
                self.show(advanced);

                if let (Some(session), Some(gpu_state)) = (&mut self.session, &mut self.gpu_state) {
                    if let Err(e) = self.render_loop.frame(session, gpu_state) {
                        log::error!("render failed: {}", e);
                        self.error = Some(e.into());
                        event_loop.exit();
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_run_without_slides_fails_fast() {
        assert!(matches!(Reveal::new().run(), Err(RevealError::NoSlides)));
    }

    #[test]
    fn test_builder_collects_slides() {
        let reveal = Reveal::new()
            .with_slide(DynamicImage::ImageRgba8(RgbaImage::new(4, 4)))
            .with_slide(DynamicImage::ImageRgba8(RgbaImage::new(4, 4)))
            .with_seed(3);
        assert_eq!(reveal.slide_count(), 2);
        assert_eq!(reveal.seed, Some(3));
    }

    #[test]
    fn test_missing_slide_file_is_an_image_error() {
        let result = Reveal::new().with_slide_file("does/not/exist.png");
        assert!(matches!(result, Err(RevealError::Image(_))));
    }
}
