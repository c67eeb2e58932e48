//! Immutable 2D pixel grid with nearest-neighbor UV sampling.

use crate::color::Color;
use crate::error::TextureError;

/// Texture data, ARGB pixels, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Texture {
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: Vec<u32>,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSize);
        }
        if pixels.len() != width * height {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A two-color checker pattern, handy for demos and UV debugging.
    pub fn checkerboard(width: usize, height: usize, cell: usize, a: Color, b: Color) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let even = (x / cell + y / cell) % 2 == 0;
                pixels.push(if even { a.to_argb() } else { b.to_argb() });
            }
        }
        Self {
            width: width.max(1),
            height: height.max(1),
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest-neighbor sample. UV are clamped to [0, 1]; v runs bottom-up
    /// (texture space) while rows run top-down, so v is flipped.
    pub fn sample(&self, u: f64, v: f64) -> u32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let x = (u * (self.width - 1) as f64).round() as usize;
        let y = ((1.0 - v) * (self.height - 1) as f64).round() as usize;
        self.pixels[y * self.width + x]
    }
}
