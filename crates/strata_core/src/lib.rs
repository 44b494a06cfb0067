//! Strata Core - renderer-agnostic numerics for terrain and display output.
//!
//! This crate provides:
//!
//! - **Color utility**: hex decoding, gamma encoding, display quantization
//! - **Image output**: `ImageBuffer` with plain-text PPM and PNG writers
//! - **Noise**: the `Turbulence` seam and a seeded `Perlin` implementation
//! - **Terrain synthesis**: `TerrainConfig`, `Heightfield`, `TerrainPalette`
//!
//! # Example
//!
//! ```ignore
//! use strata_core::{Heightfield, Perlin, TerrainConfig};
//!
//! let config = TerrainConfig::from_json_file("terrain.json")?;
//! let field = Heightfield::generate(&config, &Perlin::with_seed(config.seed));
//! let palette = config.terrain_palette();
//! println!("{} cells", field.cells(&palette).count());
//! ```

pub mod color;
pub mod config;
pub mod heightfield;
pub mod noise;
pub mod output;
pub mod palette;

// Re-export commonly used types
pub use color::{color_to_rgb8, hex_convert, linear_to_gamma, quantize, write_color, Color};
pub use config::{ConfigError, ConfigResult, TerrainConfig};
pub use heightfield::{Heightfield, TerrainCell};
pub use noise::{Perlin, Turbulence};
pub use output::{ImageBuffer, ImageError, ImageResult};
pub use palette::TerrainPalette;
