//! Procedural heightfield synthesis.
//!
//! A heightfield is a `height x width` grid of elevations summed from three
//! turbulence octaves. It is walked as 2x2 cells, each of which becomes two
//! triangles with one flat, height-banded color.

use strata_math::DVec3;

use crate::color::Color;
use crate::config::TerrainConfig;
use crate::noise::Turbulence;
use crate::palette::TerrainPalette;

/// Sample spacing of the second octave.
const SECOND_PASS: f64 = 0.05;
/// Sample spacing of the third octave.
const THIRD_PASS: f64 = 0.005;

/// Row-major grid of elevations.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    width: usize,
    height: usize,
    heights: Vec<f64>,
    tile_scale: f64,
    noise_scale: f64,
    max_height: f64,
}

/// One 2x2 block of neighbouring samples.
///
/// Corners are named `v<row offset><col offset>`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainCell {
    pub row: usize,
    pub col: usize,
    pub v00: DVec3,
    pub v10: DVec3,
    pub v01: DVec3,
    pub v11: DVec3,
    pub color: Color,
}

impl TerrainCell {
    /// Mean elevation of the four corners.
    pub fn average_height(&self) -> f64 {
        (self.v00.y + self.v10.y + self.v01.y + self.v11.y) / 4.0
    }

    /// The two triangles of the cell; they share the `v10`–`v01` edge.
    pub fn triangles(&self) -> [[DVec3; 3]; 2] {
        [
            [self.v00, self.v10, self.v01],
            [self.v01, self.v10, self.v11],
        ]
    }
}

impl Heightfield {
    /// Sample the three octaves for every grid point.
    ///
    /// Deterministic for a given config and noise state.
    pub fn generate<N: Turbulence + ?Sized>(config: &TerrainConfig, noise: &N) -> Self {
        let TerrainConfig {
            width,
            height,
            noise_scale,
            max_height,
            turbulence_depth: depth,
            ..
        } = *config;

        let mut heights = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let (x, y) = (col as f64, row as f64);

                let p1 = DVec3::new(x * noise_scale, y * noise_scale, 0.0);
                let mut h = noise.turb(p1, depth) * max_height;

                let p2 = DVec3::new(x * SECOND_PASS, y * SECOND_PASS, 0.0);
                h += noise.turb(p2 * 1.5, depth) * max_height * 0.15;

                let p3 = DVec3::new(x * THIRD_PASS, y * THIRD_PASS, 0.0);
                h += noise.turb(p3 * 6.0, depth) * max_height * 0.05;

                heights.push(h);
            }
        }

        log::debug!(
            "Generated {}x{} heightfield (noise_scale={}, max_height={})",
            width,
            height,
            noise_scale,
            max_height
        );

        Self {
            width,
            height,
            heights,
            tile_scale: config.tile_scale,
            noise_scale,
            max_height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_scale(&self) -> f64 {
        self.tile_scale
    }

    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// All elevations, row-major.
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Elevation at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.height && col < self.width {
            Some(self.heights[row * self.width + col])
        } else {
            None
        }
    }

    /// World-space position of a sample: `(row * tile, H, col * tile)`.
    fn vertex(&self, row: usize, col: usize) -> DVec3 {
        DVec3::new(
            row as f64 * self.tile_scale,
            self.heights[row * self.width + col],
            col as f64 * self.tile_scale,
        )
    }

    /// Cells per axis as `(rows, cols)`; zero when the grid is thinner than 2.
    pub fn cell_dims(&self) -> (usize, usize) {
        (self.height.saturating_sub(1), self.width.saturating_sub(1))
    }

    /// Walk every complete 2x2 block in row-major order and color it.
    pub fn cells<'a>(
        &'a self,
        palette: &'a TerrainPalette,
    ) -> impl Iterator<Item = TerrainCell> + 'a {
        let (rows, cols) = self.cell_dims();
        (0..rows).flat_map(move |i| {
            (0..cols).map(move |j| {
                let mut cell = TerrainCell {
                    row: i,
                    col: j,
                    v00: self.vertex(i, j),
                    v10: self.vertex(i + 1, j),
                    v01: self.vertex(i, j + 1),
                    v11: self.vertex(i + 1, j + 1),
                    color: Color::ZERO,
                };
                let height_factor = (cell.average_height() / self.max_height).min(1.0);
                cell.color = palette.sample(height_factor);
                cell
            })
        })
    }
}
