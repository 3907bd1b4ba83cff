use crate::error::DlaError;
use crate::grid::Rgba;
use image::{ImageBuffer, Rgba as Pixel, RgbaImage};
use std::path::Path;

/// Canvas background
pub const BACKGROUND_COLOR: Rgba = [128, 128, 128, 255];
/// Canvas marker for seed cells
pub const SEED_MARKER: Rgba = [255, 255, 255, 255];
/// Canvas marker for cells grown by attachment
pub const GROWTH_MARKER: Rgba = [0, 0, 255, 255];

/// Pixel buffer mirroring the grid one-to-one
pub trait Canvas {
    fn new(width: u32, height: u32, fill: Rgba) -> Self
    where
        Self: Sized;

    fn dimensions(&self) -> (u32, u32);

    fn clear(&mut self, color: Rgba);

    /// Out-of-range reads return `None`
    fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba>;

    /// Out-of-range writes are ignored
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba);

    /// Encode to `path`; the format follows the file extension
    fn save(&self, path: &Path) -> Result<(), DlaError>;

    /// Raw RGBA bytes, row-major
    fn to_rgba(&self) -> Vec<u8>;
}

/// `Canvas` backed by an `image::RgbaImage`
#[derive(Debug, Clone)]
pub struct ImageCanvas {
    buffer: RgbaImage,
}

impl Canvas for ImageCanvas {
    fn new(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            buffer: ImageBuffer::from_pixel(width, height, Pixel(fill)),
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    fn clear(&mut self, color: Rgba) {
        for pixel in self.buffer.pixels_mut() {
            *pixel = Pixel(color);
        }
    }

    fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.buffer.get_pixel_checked(x, y).map(|p| p.0)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(pixel) = self.buffer.get_pixel_mut_checked(x, y) {
            *pixel = Pixel(color);
        }
    }

    fn save(&self, path: &Path) -> Result<(), DlaError> {
        self.buffer.save(path)?;
        Ok(())
    }

    fn to_rgba(&self) -> Vec<u8> {
        self.buffer.as_raw().clone()
    }
}
