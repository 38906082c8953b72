//! Debug visualization of capture channels as RGBA images.
//!
//! These images are diagnostic output only; encoding and display belong to
//! the caller.

use glam::IVec2;
use landform_pixel::{Channel, PixelBuffer};

use crate::metadata::UNASSIGNED_CLUSTER_ID;

/// A 2D debug image stored as row-major RGBA pixels.
#[derive(Clone, Debug)]
pub struct DebugImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// Create a new black (all-zero) image with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    /// Set a single pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx] = r;
        self.pixels[idx + 1] = g;
        self.pixels[idx + 2] = b;
        self.pixels[idx + 3] = a;
    }

    /// Get a pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        (
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Renders the `Height` channel as grayscale, with inactive pixels (where a
/// `Mask` channel is present and unset) tinted as water.
pub fn render_height_map(buffer: &PixelBuffer) -> DebugImage {
    let size = buffer.size();
    let mut image = DebugImage::new(size.x.max(0) as u32, size.y.max(0) as u32);
    for y in 0..size.y {
        for x in 0..size.x {
            let Some(index) = buffer.index_of(IVec2::new(x, y)) else {
                continue;
            };
            let values = buffer.sample(index);
            let masked_out =
                buffer.channels() > Channel::Mask.offset() && values[Channel::Mask.offset()] == 0;
            if masked_out {
                image.set_pixel(x as u32, y as u32, 8, 24, 64, 255);
            } else {
                let v = values[Channel::Height.offset()];
                image.set_pixel(x as u32, y as u32, v, v, v, 255);
            }
        }
    }
    image
}

/// Renders the `ClusterId` channel with a distinct color per id; unassigned
/// pixels stay black.
pub fn render_cluster_map(buffer: &PixelBuffer) -> DebugImage {
    let size = buffer.size();
    let mut image = DebugImage::new(size.x.max(0) as u32, size.y.max(0) as u32);
    for y in 0..size.y {
        for x in 0..size.x {
            let Some(index) = buffer.index_of(IVec2::new(x, y)) else {
                continue;
            };
            let id = buffer.sample(index)[Channel::ClusterId.offset()];
            if id == UNASSIGNED_CLUSTER_ID {
                image.set_pixel(x as u32, y as u32, 0, 0, 0, 255);
            } else {
                let (r, g, b) = cluster_color(id);
                image.set_pixel(x as u32, y as u32, r, g, b, 255);
            }
        }
    }
    image
}

/// Maps a cluster id to a color by spreading ids around the hue wheel.
fn cluster_color(id: u8) -> (u8, u8, u8) {
    let hue = (f32::from(id) * 47.0) % 360.0;
    hsv_to_rgb(hue, 0.75, 1.0)
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (u8, u8, u8) {
    let c = value * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
