//! Image sampling into a sparse point set.
//!
//! A source image is drawn into a fixed-size canvas, composited onto the
//! canvas backdrop, and every pixel whose red channel is exactly `0` counts
//! as active. Only active pixels with even, non-zero grid coordinates are
//! kept, which thins the silhouette to roughly a quarter of its pixels.
//!
//! Grid `y` grows upwards: the bottom canvas row is `y = 1` and the top row
//! is `y = height`.
//!
//! # Example
//!
//! ```ignore
//! let sampler = ImageSampler::new(240, 240);
//! let image = image::open("slides/bird.png")?;
//! let samples = sampler.sample(&image)?;
//! ```

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::config::CanvasConfig;
use crate::error::SamplingError;

/// A canvas grid coordinate where the source image is dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelSample {
    pub x: u32,
    pub y: u32,
}

impl PixelSample {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Rasterizes images into a fixed canvas and extracts active pixels.
#[derive(Debug, Clone)]
pub struct ImageSampler {
    width: u32,
    height: u32,
    backdrop: [u8; 3],
}

impl ImageSampler {
    /// Sampler for a `width × height` canvas with a white backdrop.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            backdrop: [255, 255, 255],
        }
    }

    pub fn from_config(canvas: &CanvasConfig) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            backdrop: canvas.backdrop,
        }
    }

    pub fn with_backdrop(mut self, backdrop: [u8; 3]) -> Self {
        self.backdrop = backdrop;
        self
    }

    pub fn canvas_width(&self) -> u32 {
        self.width
    }

    pub fn canvas_height(&self) -> u32 {
        self.height
    }

    /// Draw `image` into the canvas and return its active samples.
    ///
    /// Fails with [`SamplingError::NotDrawable`] for a zero-sized image, so
    /// an undecoded source is never mistaken for a blank one.
    pub fn sample(&self, image: &DynamicImage) -> Result<Vec<PixelSample>, SamplingError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SamplingError::NotDrawable {
                width: image.width(),
                height: image.height(),
            });
        }
        let canvas = self.rasterize(image)?;
        self.sample_raster(canvas.as_raw(), canvas.width(), canvas.height())
    }

    /// Scale `image` to the canvas size as RGBA.
    pub fn rasterize(&self, image: &DynamicImage) -> Result<RgbaImage, SamplingError> {
        if self.width == 0 || self.height == 0 {
            return Err(SamplingError::NotDrawable {
                width: self.width,
                height: self.height,
            });
        }
        let rgba = image.to_rgba8();
        if rgba.dimensions() == (self.width, self.height) {
            return Ok(rgba);
        }
        Ok(imageops::resize(&rgba, self.width, self.height, FilterType::Nearest))
    }

    /// Sample a packed RGBA buffer that is already canvas-sized.
    ///
    /// `data` must hold exactly `width * height * 4` bytes and match the
    /// sampler's canvas, otherwise [`SamplingError::InvalidPixelData`] is
    /// returned.
    pub fn sample_raster(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<PixelSample>, SamplingError> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if (width, height) != (self.width, self.height) || data.len() != expected {
            return Err(SamplingError::InvalidPixelData {
                expected,
                actual: data.len(),
            });
        }

        let mut samples = Vec::new();
        for (index, px) in data.chunks_exact(4).enumerate() {
            if self.composite_red(px[0], px[3]) != 0 {
                continue;
            }
            let x = index as u32 % width;
            let y = height - index as u32 / width;
            if x != 0 && x % 2 == 0 && y % 2 == 0 {
                samples.push(PixelSample { x, y });
            }
        }
        Ok(samples)
    }

    /// Red channel after compositing onto the backdrop.
    fn composite_red(&self, red: u8, alpha: u8) -> u8 {
        match alpha {
            255 => red,
            0 => self.backdrop[0],
            a => {
                let a = a as u32;
                let blended = red as u32 * a + self.backdrop[0] as u32 * (255 - a);
                ((blended + 127) / 255) as u8
            }
        }
    }
}
