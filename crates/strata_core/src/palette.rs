//! Height-banded terrain colors.

use crate::color::{hex_convert, Color};

/// Band boundary between the first and second gradient segments.
const LOW_BAND: f64 = 0.3;
/// Band boundary between the second and third gradient segments.
const MID_BAND: f64 = 0.5;

/// Three-segment piecewise-linear gradient over four color stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainPalette {
    pub stops: [Color; 4],
}

impl TerrainPalette {
    /// Dark brown, orange brown, golden brown, yellow.
    pub const DESERT_HEX: [u32; 4] = [0x522E0E, 0xC75B12, 0xC27D0E, 0xFFB700];

    pub fn new(stops: [Color; 4]) -> Self {
        Self { stops }
    }

    pub fn from_hex(hex: [u32; 4]) -> Self {
        Self::new(hex.map(hex_convert))
    }

    /// Color for a normalized height `t_h` (expected `<= 1`).
    ///
    /// `[0, 0.3)` blends stops 0→1, `[0.3, 0.5)` blends 1→2, and everything
    /// from 0.5 up blends 2→3.
    pub fn sample(&self, t_h: f64) -> Color {
        let [c0, c1, c2, c3] = self.stops;
        if t_h < LOW_BAND {
            let t = t_h / LOW_BAND;
            c0 * (1.0 - t) + c1 * t
        } else if t_h < MID_BAND {
            let t = (t_h - LOW_BAND) / (MID_BAND - LOW_BAND);
            c1 * (1.0 - t) + c2 * t
        } else {
            let t = (t_h - MID_BAND) / (1.0 - MID_BAND);
            c2 * (1.0 - t) + c3 * t
        }
    }
}

impl Default for TerrainPalette {
    fn default() -> Self {
        Self::from_hex(Self::DESERT_HEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey_ramp() -> TerrainPalette {
        TerrainPalette::new([
            Color::splat(0.0),
            Color::splat(0.3),
            Color::splat(0.6),
            Color::splat(1.0),
        ])
    }

    fn assert_close(a: Color, b: Color) {
        assert!((a - b).abs().max_element() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_band_endpoints() {
        let palette = grey_ramp();
        assert_close(palette.sample(0.0), palette.stops[0]);
        assert_close(palette.sample(0.3), palette.stops[1]);
        assert_close(palette.sample(0.5), palette.stops[2]);
        assert_close(palette.sample(1.0), palette.stops[3]);
    }

    #[test]
    fn test_band_midpoints() {
        let palette = grey_ramp();
        // halfway through each band
        assert_close(palette.sample(0.15), Color::splat(0.15));
        assert_close(palette.sample(0.4), Color::splat(0.45));
        assert_close(palette.sample(0.75), Color::splat(0.8));
    }

    #[test]
    fn test_default_palette_stops() {
        let palette = TerrainPalette::default();
        assert_eq!(palette.stops[0], hex_convert(0x522E0E));
        assert_eq!(palette.stops[3], hex_convert(0xFFB700));
    }
}
