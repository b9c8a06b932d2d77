//! Frame timing for the render loop.
//!
//! The reveal never integrates over delta time: particles and camera move a
//! fixed fraction per frame. The clock exists to timestamp frames for the
//! deferred reconcile and carousel, and to report FPS.
//!
//! # Example
//!
//! ```ignore
//! use morphfield::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // Once per host frame:
//! let now = clock.tick();
//! log::trace!("frame {} at {:?} ({:.1} fps)", clock.frame(), now, clock.fps());
//! ```

use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Monotonic per-frame clock.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    /// Time since start at the most recent frame.
    elapsed: Duration,
    /// Time between the two most recent frames.
    delta: Duration,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_window_start: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_window_start: Duration::ZERO,
        }
    }

    /// Record a frame at the current wall-clock time.
    ///
    /// Returns the elapsed time since the clock was created.
    pub fn tick(&mut self) -> Duration {
        let now = self.start.elapsed();
        self.tick_at(now)
    }

    /// Record a frame at an explicit elapsed time.
    ///
    /// Times earlier than the previous frame are clamped so the clock never
    /// runs backwards.
    pub fn tick_at(&mut self, elapsed: Duration) -> Duration {
        let elapsed = elapsed.max(self.elapsed);
        self.delta = elapsed - self.elapsed;
        self.elapsed = elapsed;
        self.frame_count += 1;

        let window = elapsed - self.fps_window_start;
        if window >= FPS_WINDOW {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / window.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_window_start = elapsed;
        }

        self.elapsed
    }

    /// Elapsed time since start, without recording a frame.
    #[inline]
    pub fn now(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last measurement window.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
