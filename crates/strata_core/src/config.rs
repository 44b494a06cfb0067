//! Terrain configuration.
//!
//! Every value the terrain builder consumes, palette included, lives here so
//! scenes pass explicit settings instead of reading process-wide constants.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::TerrainPalette;

/// Errors that can occur while loading a terrain configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid terrain config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Grid size, scales and colors for one procedural terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Samples along a row (column count)
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// World-space spacing between neighbouring samples
    pub tile_scale: f64,
    /// Positional scale of the first noise octave
    pub noise_scale: f64,
    /// Amplitude of the first octave; also the top of the color gradient
    pub max_height: f64,
    /// Octaves summed inside each turbulence query
    pub turbulence_depth: u32,
    /// Seed for the default noise tables
    pub seed: u64,
    /// Four `0xRRGGBB` gradient stops, low to high
    pub palette: [u32; 4],
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            tile_scale: 1.0,
            noise_scale: 0.005,
            max_height: 35.0,
            turbulence_depth: 7,
            seed: 0,
            palette: TerrainPalette::DESERT_HEX,
        }
    }
}

impl TerrainConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: TerrainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Reject values that would make heights or colors meaningless.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.max_height.is_finite() && self.max_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_height must be finite and positive, got {}",
                self.max_height
            )));
        }
        if !(self.tile_scale.is_finite() && self.tile_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tile_scale must be finite and positive, got {}",
                self.tile_scale
            )));
        }
        if !self.noise_scale.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "noise_scale must be finite, got {}",
                self.noise_scale
            )));
        }
        if self.width < 2 || self.height < 2 {
            log::warn!(
                "Terrain grid {}x{} has no complete cells and will produce no triangles",
                self.width,
                self.height
            );
        }
        Ok(())
    }

    /// Gradient built from the configured stops.
    pub fn terrain_palette(&self) -> TerrainPalette {
        TerrainPalette::from_hex(self.palette)
    }
}
