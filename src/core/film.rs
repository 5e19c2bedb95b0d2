use crate::variant::ColorMode;

use super::{
    bitmap::{ImageBuffer, PixelFormat},
    color::Color,
};

/// Averaged radiance of rows `from..to`, produced by one render worker.
pub struct FilmTile {
    pub from: u32,
    pub to: u32,
    pub pixels: Vec<Color>,
}

pub struct Film {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FilmTile {
    pub fn new(from: u32, to: u32, width: u32) -> Self {
        Self {
            from,
            to,
            pixels: Vec::with_capacity(((to - from) * width) as usize),
        }
    }
}

impl Film {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    pub fn merge_tile(&mut self, tile: FilmTile) {
        let start = tile.from as usize * self.width as usize;
        let end = tile.to as usize * self.width as usize;
        debug_assert_eq!(end - start, tile.pixels.len());
        self.pixels[start..end].copy_from_slice(&tile.pixels);
    }

    pub fn into_image_buffer(self, mode: ColorMode) -> ImageBuffer {
        let data = match mode {
            ColorMode::Mono => self.pixels.iter().map(|c| c.luminance()).collect(),
            ColorMode::Rgb => self.pixels.iter().flat_map(|c| [c.r, c.g, c.b]).collect(),
        };
        let format = match mode {
            ColorMode::Mono => PixelFormat::Y,
            ColorMode::Rgb => PixelFormat::Rgb,
        };
        ImageBuffer::new(self.width, self.height, format, data)
    }
}
