//! End-to-end reveal cycles against a recording backend.

use std::time::Duration;

use image::{DynamicImage, Rgba, RgbaImage};
use morphfield::prelude::*;
use morphfield::{Carousel, ImageSampler, Projection};

#[derive(Default)]
struct Recorder {
    frames: Vec<FrameRecord>,
}

struct FrameRecord {
    index: u64,
    particles: usize,
    cubes: usize,
    orthographic: bool,
}

impl RenderBackend for Recorder {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.frames.push(FrameRecord {
            index: frame.index,
            particles: frame.particles.len(),
            cubes: frame.background.cubes().len(),
            orthographic: frame.viewport.width > 900.0,
        });
        Ok(())
    }
}

fn black_square(canvas: u32, from: u32, to: u32) -> DynamicImage {
    let mut img = RgbaImage::from_pixel(canvas, canvas, Rgba([255, 255, 255, 255]));
    for y in from..to {
        for x in from..to {
            img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    DynamicImage::ImageRgba8(img)
}

fn blank(canvas: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        canvas,
        canvas,
        Rgba([255, 255, 255, 255]),
    ))
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn wide() -> Viewport {
    Viewport::new(1300.0, 800.0)
}

#[test]
fn test_black_square_samples_interior_even_grid() {
    let sampler = ImageSampler::new(240, 240);
    let samples = sampler.sample(&black_square(240, 80, 160)).unwrap();

    // x even in [80, 158], y = 240 - row even in [82, 160]
    assert_eq!(samples.len(), 1600);
    for s in &samples {
        assert!(s.x % 2 == 0 && (80..=158).contains(&s.x), "{:?}", s);
        assert!(s.y % 2 == 0 && (82..=160).contains(&s.y), "{:?}", s);
    }
    for x in (80..=158).step_by(2) {
        for y in (82..=160).step_by(2) {
            assert!(samples.contains(&PixelSample::new(x, y)));
        }
    }
}

#[test]
fn test_blank_mask_parks_whole_pool() {
    let mut session = Session::with_seed(RevealConfig::default(), wide(), vec![], 11).unwrap();
    let samples: Vec<PixelSample> = (0..100)
        .map(|i| PixelSample::new(2 * (i % 50 + 1), 2 * (i / 50 + 1)))
        .collect();
    session.reconcile_now(&samples);
    assert_eq!(session.field().len(), 100);

    session.reconcile_now(&[]);
    let min = session.policy().min_park_radius();
    assert_eq!(session.field().len(), 100);
    assert_eq!(session.field().active_count(), 0);
    for p in session.field().particles() {
        assert!(!session.policy().is_image_target(p.target));
        assert!(p.target.truncate().length() >= min - 0.01);
    }
}

#[test]
fn test_pool_grows_and_surplus_parks() {
    let mut session = Session::with_seed(RevealConfig::default(), wide(), vec![], 3).unwrap();
    let small: Vec<PixelSample> = (1..=10).map(|i| PixelSample::new(2 * i, 2)).collect();
    let large: Vec<PixelSample> = (1..=30).map(|i| PixelSample::new(2 * i, 4)).collect();

    session.reconcile_now(&small);
    assert_eq!(session.field().len(), 10);

    session.reconcile_now(&large);
    assert_eq!(session.field().len(), 30);
    assert!(session
        .field()
        .particles()
        .iter()
        .all(|p| session.policy().is_image_target(p.target)));

    session.reconcile_now(&small);
    assert_eq!(session.field().len(), 30);
    let parked = session
        .field()
        .particles()
        .iter()
        .filter(|p| !session.policy().is_image_target(p.target))
        .count();
    assert_eq!(parked, 20);
}

#[test]
fn test_band_1300_orthographic_parameters() {
    let session = Session::with_seed(RevealConfig::default(), wide(), vec![], 1).unwrap();
    match *session.camera().projection() {
        Projection::Orthographic {
            left,
            right,
            top,
            bottom,
            ..
        } => {
            assert_eq!(left, 1300.0 / -0.9);
            assert_eq!(right, 1300.0 / 2.7);
            assert_eq!(top, 400.0);
            assert_eq!(bottom, -400.0);
        }
        ref other => panic!("expected orthographic, got {:?}", other),
    }
}

#[test]
fn test_slide_cycle_through_render_loop() {
    let config = RevealConfig::default().with_auto_advance(Some(ms(2000)));
    let slides = vec![black_square(240, 80, 160), black_square(240, 100, 140), blank(240)];
    let mut carousel = Carousel::new(slides.len(), config.timing.auto_advance());
    let mut session = Session::with_seed(config, wide(), slides, 42).unwrap();
    let mut backend = Recorder::default();
    let mut render_loop = RenderLoop::new();

    session.start(ms(0)).unwrap();
    let mut now = ms(0);
    for _ in 0..400 {
        now += ms(16);
        if let Some(index) = carousel.poll(now) {
            session.select(index, now).unwrap();
        }
        render_loop.frame_at(now, &mut session, &mut backend).unwrap();
        if now >= ms(600) && now < ms(2000) {
            assert_eq!(session.field().active_count(), 1600);
        }
    }

    // 400 frames over 6.4s: 0 -> 1 at 2s, -> 2 at 4s, -> 0 at 6s
    assert_eq!(backend.frames.len(), 400);
    assert_eq!(backend.frames.last().map(|f| f.index), Some(400));
    assert!(backend.frames.iter().all(|f| f.cubes == 40 && f.orthographic));
    assert_eq!(carousel.selected(), 0);
    assert_eq!(session.field().len(), 1600);
    // the blank slide parked everything; slide 0 is still settling
    assert_eq!(session.field().active_count(), 0);
    assert_eq!(session.pending_reconciles(), 1);
    assert!(backend.frames.windows(2).all(|w| w[0].particles <= w[1].particles));
}

#[test]
fn test_particles_converge_after_settle() {
    let mut session =
        Session::with_seed(RevealConfig::default(), wide(), vec![black_square(240, 110, 130)], 7)
            .unwrap();
    let mut backend = Recorder::default();
    let mut render_loop = RenderLoop::new();
    session.start(ms(0)).unwrap();

    let mut now = ms(0);
    while now < ms(500) {
        now += ms(16);
        render_loop.frame_at(now, &mut session, &mut backend).unwrap();
    }
    assert_eq!(session.pending_reconciles(), 0);
    // ~0.87^90 of the starting gap remains after 90 more frames
    for _ in 0..90 {
        now += ms(16);
        render_loop.frame_at(now, &mut session, &mut backend).unwrap();
    }
    assert!(session
        .field()
        .particles()
        .iter()
        .all(|p| p.distance_to_target() < 0.1));
}

#[test]
fn test_narrow_viewport_is_perspective() {
    let mut session = Session::with_seed(RevealConfig::default(), wide(), vec![], 1).unwrap();
    session.resize(Viewport::new(600.0, 900.0));
    assert!(!session.camera().projection().is_orthographic());
    assert_eq!(session.camera().band(), None);

    let mut backend = Recorder::default();
    RenderLoop::new()
        .frame_at(ms(16), &mut session, &mut backend)
        .unwrap();
    assert!(!backend.frames[0].orthographic);
}
