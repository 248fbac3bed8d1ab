//! Island heightmap generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod coastline;
pub mod coherent;
pub mod config;
pub mod elevation;
pub mod error;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod island;
pub mod octave;
pub mod raster;
pub mod sampler;
pub mod seeds;
pub mod tilemap;

pub use config::{GeneratorConfig, IslandConfig};
pub use error::{GenError, Result};
pub use generator::{generate, IslandMap};
