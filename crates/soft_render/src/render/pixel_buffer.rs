//! Depth-tested pixel buffer
//!
//! Stores 12-bit color intensities and an integer depth per pixel, row-major.
//! Writes keep the nearest surface: a pixel only accepts a depth that is
//! non-negative and no farther than what it already holds.

use serde::{Deserialize, Serialize};

use super::RenderError;

/// Color channel intensity (valid range 0..=4095 once stored)
pub type Intensity = i16;

/// Pixel depth; smaller is closer
pub type Depth = i32;

/// Largest storable channel intensity
pub const MAX_INTENSITY: Intensity = 4095;

/// Depth of a pixel nothing has been drawn to yet
pub const FAR_DEPTH: Depth = Depth::MAX;

/// One pixel's color and depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    /// Red intensity
    pub red: Intensity,
    /// Green intensity
    pub green: Intensity,
    /// Blue intensity
    pub blue: Intensity,
    /// Alpha intensity
    pub alpha: Intensity,
    /// Depth value
    pub depth: Depth,
}

impl Pixel {
    /// Create a pixel from channel values and a depth
    pub const fn new(red: Intensity, green: Intensity, blue: Intensity, alpha: Intensity, depth: Depth) -> Self {
        Self { red, green, blue, alpha, depth }
    }

    /// Background pixel: given color, farthest depth
    pub const fn background(red: Intensity, green: Intensity, blue: Intensity, alpha: Intensity) -> Self {
        Self::new(red, green, blue, alpha, FAR_DEPTH)
    }

    fn clamped(self) -> Self {
        Self {
            red: self.red.clamp(0, MAX_INTENSITY),
            green: self.green.clamp(0, MAX_INTENSITY),
            blue: self.blue.clamp(0, MAX_INTENSITY),
            alpha: self.alpha.clamp(0, MAX_INTENSITY),
            depth: self.depth,
        }
    }

    /// Channel reduced to 8 bits for display
    pub const fn to_byte(intensity: Intensity) -> u8 {
        ((intensity >> 4) & 0xff) as u8
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Self::background(2055, 1798, 1541, 1)
    }
}

/// Resolution-sized grid of pixels
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
    background: Pixel,
}

impl PixelBuffer {
    /// Allocate a buffer filled with the default background
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_background(width, height, Pixel::default())
    }

    /// Allocate a buffer filled with `background`
    pub fn with_background(width: usize, height: usize, background: Pixel) -> Self {
        let background = Pixel { depth: FAR_DEPTH, ..background.clamped() };
        Self {
            pixels: vec![background; width * height],
            width,
            height,
            background,
        }
    }

    /// Buffer width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Background every reset restores
    pub const fn background(&self) -> Pixel {
        self.background
    }

    /// All pixels, row-major
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Restore every pixel to the background color at the farthest depth
    pub fn reset(&mut self) {
        self.pixels.fill(self.background);
    }

    fn index(&self, col: i32, row: i32) -> Result<usize, RenderError> {
        let out_of_bounds = || RenderError::PixelOutOfBounds {
            col,
            row,
            width: self.width,
            height: self.height,
        };
        let c = usize::try_from(col).map_err(|_| out_of_bounds())?;
        let r = usize::try_from(row).map_err(|_| out_of_bounds())?;
        if c >= self.width || r >= self.height {
            return Err(out_of_bounds());
        }
        Ok(r * self.width + c)
    }

    /// Depth-tested write.
    ///
    /// Returns `Ok(true)` when the pixel was overwritten and `Ok(false)` when
    /// the depth test rejected it (a farther or negative depth). Channels are
    /// clamped to `0..=MAX_INTENSITY`.
    pub fn put(&mut self, col: i32, row: i32, pixel: Pixel) -> Result<bool, RenderError> {
        let index = self.index(col, row)?;
        let stored = &mut self.pixels[index];
        if stored.depth < pixel.depth || pixel.depth < 0 {
            return Ok(false);
        }
        *stored = pixel.clamped();
        Ok(true)
    }

    /// Read a pixel unchanged
    pub fn get(&self, col: i32, row: i32) -> Result<Pixel, RenderError> {
        let index = self.index(col, row)?;
        Ok(self.pixels[index])
    }
}
