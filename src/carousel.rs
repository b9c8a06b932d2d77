//! Slide selection with wrap-around and optional auto-advance.
//!
//! Stands in for the slider widget: every method that changes the visible
//! slide returns `Some(index)`, which the host forwards to
//! [`Session::select`](crate::Session::select).

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    selected: usize,
    auto_advance: Option<Duration>,
    last_change: Duration,
}

impl Carousel {
    /// Carousel over `len` slides, starting at slide 0.
    pub fn new(len: usize, auto_advance: Option<Duration>) -> Self {
        Self {
            len,
            selected: 0,
            auto_advance,
            last_change: Duration::ZERO,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Jump to `index`. Returns `None` if out of range or already selected.
    pub fn select(&mut self, index: usize, now: Duration) -> Option<usize> {
        if index >= self.len || index == self.selected {
            return None;
        }
        self.selected = index;
        self.last_change = now;
        Some(index)
    }

    /// Next slide, wrapping after the last.
    pub fn next(&mut self, now: Duration) -> Option<usize> {
        if self.len < 2 {
            return None;
        }
        self.select((self.selected + 1) % self.len, now)
    }

    /// Previous slide, wrapping before the first.
    pub fn previous(&mut self, now: Duration) -> Option<usize> {
        if self.len < 2 {
            return None;
        }
        self.select((self.selected + self.len - 1) % self.len, now)
    }

    /// Advance if the auto-advance interval elapsed since the last change.
    ///
    /// Manual changes restart the interval.
    pub fn poll(&mut self, now: Duration) -> Option<usize> {
        let interval = self.auto_advance?;
        if now.saturating_sub(self.last_change) >= interval {
            let changed = self.next(now);
            self.last_change = now;
            changed
        } else {
            None
        }
    }
}
