//! Linear-light color helpers and display quantization.
//!
//! Colors stay in linear light throughout geometry and shading. They are only
//! gamma encoded and quantized when written out, using the exact constants of
//! the reference renders (`0.999` clamp ceiling, `255.99` scale, truncation).

use std::io::{self, Write};

use strata_math::{DVec3, Interval};

/// Color type alias (linear RGB, components in `[0, inf)`).
pub type Color = DVec3;

/// Display range a gamma-encoded channel is clamped into before quantizing.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Decode a `0xRRGGBB` packed integer into a color with channels in `[0, 1]`.
///
/// Bits above the low 24 are ignored.
pub fn hex_convert(hex_value: u32) -> Color {
    let r = ((hex_value >> 16) & 0xFF) as f64 / 255.0;
    let g = ((hex_value >> 8) & 0xFF) as f64 / 255.0;
    let b = (hex_value & 0xFF) as f64 / 255.0;
    Color::new(r, g, b)
}

/// Apply gamma correction (gamma = 2.0).
///
/// Zero, negative and NaN inputs map to `0.0`.
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize one gamma-encoded channel to a display byte.
#[inline]
pub fn quantize(channel: f64) -> u8 {
    (255.99 * INTENSITY.clamp(channel)) as u8
}

/// Convert a linear color to gamma-encoded 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [
        quantize(linear_to_gamma(color.x)),
        quantize(linear_to_gamma(color.y)),
        quantize(linear_to_gamma(color.z)),
    ]
}

/// Write one pixel as `"r g b\n"`, the body line format of a plain-text PPM.
pub fn write_color<W: Write + ?Sized>(out: &mut W, color: Color) -> io::Result<()> {
    let [r, g, b] = color_to_rgb8(color);
    writeln!(out, "{} {} {}", r, g, b)
}
