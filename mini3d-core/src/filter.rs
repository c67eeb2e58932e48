//! Post-processing filters over rendered ARGB buffers.
//!
//! Stateless and independent of the rasterizer: input is a raw pixel
//! buffer plus flags, output is a new buffer. Per pixel: grayscale
//! (channel mean), then contrast around mid-gray, then brightness, all
//! in normalized [0,1] space; edge detection, if enabled, runs last on
//! the adjusted image and replaces it with the luminance gradient
//! magnitude (central difference), border pixels forced black.

use crate::color::Color;
use crate::error::FilterError;

#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub grayscale: bool,
    /// Added to each normalized channel, 0.0 = unchanged.
    pub brightness: f64,
    /// Scales each channel around 0.5; 1.0 = unchanged.
    pub contrast: f64,
    pub edge_detect: bool,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self {
            grayscale: false,
            brightness: 0.0,
            contrast: 1.0,
            edge_detect: false,
        }
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::new()
    }
}

pub fn apply(
    width: usize,
    height: usize,
    pixels: &[u32],
    options: &FilterOptions,
) -> Result<Vec<u32>, FilterError> {
    if pixels.len() != width * height {
        return Err(FilterError::SizeMismatch {
            width,
            height,
            actual: pixels.len(),
        });
    }

    let mut buf: Vec<[f64; 3]> = Vec::with_capacity(pixels.len());
    for &p in pixels {
        let c = Color::from_argb(p);
        let mut rgb = [
            c.r as f64 / 255.0,
            c.g as f64 / 255.0,
            c.b as f64 / 255.0,
        ];
        if options.grayscale {
            let g = (rgb[0] + rgb[1] + rgb[2]) / 3.0;
            rgb = [g, g, g];
        }
        for v in &mut rgb {
            *v = clamp01((*v - 0.5) * options.contrast + 0.5 + options.brightness);
        }
        buf.push(rgb);
    }

    if !options.edge_detect {
        return Ok(buf.iter().map(|rgb| pack(*rgb)).collect());
    }

    // Gradient magnitude of the adjusted luminance; the one-pixel
    // border has no central difference and stays black.
    let mut out = vec![Color::BLACK.to_argb(); pixels.len()];
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let gx = luminance(buf[y * width + x + 1]) - luminance(buf[y * width + x - 1]);
            let gy = luminance(buf[(y + 1) * width + x]) - luminance(buf[(y - 1) * width + x]);
            let mag = clamp01((gx * gx + gy * gy).sqrt());
            out[y * width + x] = pack([mag, mag, mag]);
        }
    }
    Ok(out)
}

/// Rec.709 luma of a normalized RGB triple.
fn luminance(rgb: [f64; 3]) -> f64 {
    0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn pack(rgb: [f64; 3]) -> u32 {
    let ch = |v: f64| (clamp01(v) * 255.0).round() as u8;
    Color::new(ch(rgb[0]), ch(rgb[1]), ch(rgb[2])).to_argb()
}
