// THEORY:
// The `Frame` module defines the input contract with the external decoding
// collaborator. A `Frame` is a fully decoded RGBA buffer plus the metadata
// the temporal stages key on: a timestamp in seconds and the fixed
// width/height of the run. The analyzer consumes frames by value so the
// pixel buffer can be dropped as soon as per-frame metrics are derived,
// keeping memory bounded on long clips.

use crate::core_modules::pixel::pixel::Pixel;

/// One decoded video frame as handed over by the decoding subsystem.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Presentation time in seconds. Monotonically non-decreasing across a
    /// run, but not necessarily evenly spaced.
    pub timestamp: f64,
    /// Frame width in pixels. Constant for a whole run.
    pub width: u32,
    /// Frame height in pixels. Constant for a whole run.
    pub height: u32,
    /// Flattened RGBA buffer, row-major, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(timestamp: f64, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            timestamp,
            width,
            height,
            pixels,
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// The pixel at (x, y). Callers guarantee the coordinates are in bounds.
    pub fn pixel_at(&self, x: u32, y: u32) -> Pixel {
        let offset = ((y as usize * self.width as usize) + x as usize) * 4;
        Pixel::from(&self.pixels[offset..offset + 4])
    }

    /// Iterates every pixel of the frame in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.pixels.chunks_exact(4).map(Pixel::from)
    }
}
