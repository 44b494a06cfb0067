//! Image buffer and display output.
//!
//! Holds linear colors in raster order and writes them either as a
//! plain-text PPM or as a PNG. Both paths share the same quantized bytes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::color::{color_to_rgb8, write_color, Color};

/// Errors that can occur while writing images.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] ::image::ImageError),

    #[error("Pixel buffer does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32 },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// Simple image buffer for storing linear colors.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Gamma-encoded RGB bytes in raster order.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }

    /// Write a plain-text (P3) PPM: header, then one `r g b` line per pixel.
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> ImageResult<()> {
        if self.pixels.len() != self.width as usize * self.height as usize {
            return Err(ImageError::SizeMismatch {
                width: self.width,
                height: self.height,
            });
        }

        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for color in &self.pixels {
            write_color(writer, *color)?;
        }

        Ok(())
    }

    /// Save as a plain-text PPM file.
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_ppm(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Save as PNG through the `image` crate.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let rgb = ::image::RgbImage::from_raw(self.width, self.height, self.to_rgb8()).ok_or(
            ImageError::SizeMismatch {
                width: self.width,
                height: self.height,
            },
        )?;
        rgb.save(path.as_ref())?;
        Ok(())
    }
}
